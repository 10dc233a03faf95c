//! # OTP Entry Engine
//!
//! Toolkit-agnostic state machine for a one-time-password entry widget: a
//! row of single-digit slots with auto-advance, backspace and arrow
//! navigation, paste distribution, and a delayed auto-submit once every slot
//! holds a digit.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use otp_entry_engine::{ManualScheduler, OtpEntryController, SharedFocusFlag};
//! use otp_entry_types::OtpConfig;
//!
//! let config = OtpConfig::new(4)?.with_auto_submit_delay(Duration::from_millis(250));
//! let mut controller: OtpEntryController<ManualScheduler, SharedFocusFlag> =
//!     OtpEntryController::new(&config, ManualScheduler::new(), |code: &str| println!("submitted {code}"));
//! controller.mount();
//! controller.handle_paste("1234");
//!
//! for ticket in controller.scheduler_mut().advance(Duration::from_millis(250)) {
//!     controller.fire(ticket);
//! }
//! assert!(controller.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`buffer`**: the fixed-length digit buffer
//! - **`controller`**: event handlers and the completion state machine
//! - **`focus`**: the handle trait through which the controller moves focus
//! - **`scheduler`**: cancellable one-shot timers (Tokio and virtual clock)

pub mod buffer;
pub mod controller;
pub mod focus;
pub mod scheduler;

pub use buffer::CodeBuffer;
pub use controller::{CompletionCallback, OtpEntryController};
pub use focus::{SharedFocusFlag, SlotFocus, focused_index};
pub use scheduler::{ManualScheduler, ManualTimer, Scheduler, TokioScheduler, TokioTimer};
