//! Controller configuration fixed at creation time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::OtpError;

/// Number of slots used when none is configured.
pub const DEFAULT_OTP_LENGTH: usize = 5;
/// Wait between the last digit landing and the completion callback.
pub const DEFAULT_AUTO_SUBMIT_DELAY: Duration = Duration::from_millis(500);
/// Widest code the terminal host lays out on one row.
pub const MAX_OTP_LENGTH: usize = 32;

/// When the buffer is cleared relative to the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetOrder {
    /// Invoke the callback, then clear every slot.
    #[default]
    AfterCallback,
    /// Clear every slot, then invoke the callback with the captured code.
    BeforeCallback,
}

/// Validated settings for one OTP entry controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpConfig {
    otp_length: usize,
    auto_submit_delay: Duration,
    prefill: Option<String>,
    reset_order: ResetOrder,
}

impl OtpConfig {
    /// Builds a configuration for `otp_length` slots with default timing.
    pub fn new(otp_length: usize) -> Result<Self, OtpError> {
        if otp_length == 0 || otp_length > MAX_OTP_LENGTH {
            return Err(OtpError::InvalidLength { length: otp_length });
        }
        Ok(Self {
            otp_length,
            auto_submit_delay: DEFAULT_AUTO_SUBMIT_DELAY,
            prefill: None,
            reset_order: ResetOrder::default(),
        })
    }

    pub fn with_auto_submit_delay(mut self, delay: Duration) -> Self {
        self.auto_submit_delay = delay;
        self
    }

    /// Seeds the buffer at creation. Digits are extracted the same way a paste
    /// extracts them; an empty or digit-free value leaves the buffer empty.
    pub fn with_prefill(mut self, prefill: impl Into<String>) -> Self {
        let prefill = prefill.into();
        self.prefill = if prefill.trim().is_empty() { None } else { Some(prefill) };
        self
    }

    pub fn with_reset_order(mut self, reset_order: ResetOrder) -> Self {
        self.reset_order = reset_order;
        self
    }

    pub fn otp_length(&self) -> usize {
        self.otp_length
    }

    pub fn auto_submit_delay(&self) -> Duration {
        self.auto_submit_delay
    }

    pub fn prefill(&self) -> Option<&str> {
        self.prefill.as_deref()
    }

    pub fn reset_order(&self) -> ResetOrder {
        self.reset_order
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            otp_length: DEFAULT_OTP_LENGTH,
            auto_submit_delay: DEFAULT_AUTO_SUBMIT_DELAY,
            prefill: None,
            reset_order: ResetOrder::default(),
        }
    }
}
