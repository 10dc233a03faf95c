//! Configuration and filesystem helpers for the OTP entry binaries.

pub mod path_processing;
pub mod settings;

pub use path_processing::{LOG_PATH_ENV, expand_tilde, resolve_log_path};
pub use settings::{SETTINGS_PATH_ENV, SettingsError, SettingsPayload, UserSettings};
