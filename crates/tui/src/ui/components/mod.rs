//! UI components: the OTP entry group.

pub mod component;
pub mod otp_entry;

pub(crate) use component::Component;
