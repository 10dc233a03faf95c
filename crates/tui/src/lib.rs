//! # OTP Entry TUI Library
//!
//! This library hosts the one-time-code entry widget in a terminal. Each digit
//! gets its own box; typing advances focus, Backspace and the arrow keys move
//! between boxes, and a bracketed paste (or Ctrl+V) fills the whole code. Once
//! every box holds a digit the code is submitted after a short delay and the
//! verification result is shown under the widget.
//!
//! ## Architecture
//!
//! The digit buffer, focus movement, and auto-submit timer live in
//! `otp-entry-engine`. This crate maps terminal input onto that controller,
//! renders it with Ratatui, and feeds scheduler tickets back through a single
//! `tokio::select!` loop.

mod app;
mod ui;

use anyhow::Result;

pub use app::{CodeVerifier, DEFAULT_EXPECTED_CODE, ExpectedCode, TuiOptions};

/// Runs the TUI until the user quits.
///
/// # Errors
///
/// Returns an error when the terminal cannot be put into raw mode, a frame
/// fails to draw, or the configuration is rejected by the controller.
///
/// # Example
///
/// ```no_run
/// use otp_entry_tui::{ExpectedCode, TuiOptions, run};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let options = TuiOptions {
///         verifier: Box::new(ExpectedCode::new("424242")),
///         demo_hint: None,
///         ..TuiOptions::default()
///     };
///     run(options).await
/// }
/// ```
pub async fn run(options: TuiOptions) -> Result<()> {
    ui::runtime::run_app(options).await
}
