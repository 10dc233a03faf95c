//! Segmented one-time-code entry: one box per digit.

mod otp_entry_component;
mod state;

pub use otp_entry_component::{OtpEntryComponent, SLOT_GAP, SLOT_WIDTH};
pub use state::OtpEntryState;
