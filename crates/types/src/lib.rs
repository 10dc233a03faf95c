//! Shared type definitions for the OTP entry widget.
//!
//! Everything here is toolkit-agnostic: the controller in `otp-entry-engine`,
//! the settings store in `otp-entry-util`, and the terminal host all speak in
//! these types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;

pub use config::{DEFAULT_AUTO_SUBMIT_DELAY, DEFAULT_OTP_LENGTH, MAX_OTP_LENGTH, OtpConfig, ResetOrder};

/// Accessible label carried by the group of digit boxes.
pub const GROUP_LABEL: &str = "Enter verification code";

/// Errors raised while building or wiring an OTP entry controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    /// The configured number of slots is zero or larger than a row can hold.
    #[error("otp length must be between 1 and {max}, got {length}", max = MAX_OTP_LENGTH)]
    InvalidLength { length: usize },
    /// A slot index referenced a position outside the buffer.
    #[error("slot index {index} is out of range for a {length}-digit code")]
    SlotOutOfRange { index: usize, length: usize },
}

/// Keys the navigation handler distinguishes.
///
/// Everything that is not one of the named keys arrives as `Other` and is left
/// to the slot's native editing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Backspace,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Completion state of the code buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryState {
    /// At least one slot is empty and no submit is pending.
    #[default]
    Incomplete,
    /// Every slot holds a digit and the auto-submit timer is armed.
    Complete,
}

/// Identifies one arming of the auto-submit timer.
///
/// Tickets are handed to the scheduler and come back when the delay elapses.
/// Only the ticket of the most recent arming is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmitTicket(u64);

impl SubmitTicket {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }

    /// The ticket issued after this one.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SubmitTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome a host reports after checking a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected,
}

/// Accessible label for one slot, e.g. `Digit 2 of 5`.
pub fn slot_label(index: usize, length: usize) -> String {
    format!("Digit {} of {}", index + 1, length)
}

/// Returns the ASCII decimal digits of `text`, in order, dropping everything else.
pub fn extract_digits(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(char::is_ascii_digit)
}
