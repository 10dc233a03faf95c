//! User settings persistence for the OTP entry CLI/TUI.
//!
//! Settings live in a small JSON file in the standard configuration directory
//! (`~/.config/otp-entry/settings.json` on most platforms). Every field is
//! optional; anything left out falls back to the widget defaults. The store
//! is safe to share across threads thanks to the internal `Mutex`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use dirs_next::config_dir;
use otp_entry_types::{OtpConfig, OtpError, ResetOrder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the settings file path.
pub const SETTINGS_PATH_ENV: &str = "OTP_ENTRY_SETTINGS_PATH";

/// Default filename for the JSON payload.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Error surfaced when reading or writing settings fails.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted setting values.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPayload {
    /// Number of digit slots.
    pub otp_length: Option<usize>,
    /// Wait between the last digit and the completion callback, in milliseconds.
    pub auto_submit_delay_ms: Option<u64>,
    /// Digits placed in the slots when the widget mounts.
    pub prefill: Option<String>,
    /// Whether the buffer clears before or after the completion callback.
    pub reset_order: Option<ResetOrder>,
    /// Canonical identifier of the terminal theme.
    pub preferred_theme: Option<String>,
    /// Code the demo verifier accepts.
    pub expected_code: Option<String>,
}

impl SettingsPayload {
    /// Builds a validated controller configuration, filling gaps with defaults.
    pub fn otp_config(&self) -> Result<OtpConfig, OtpError> {
        let defaults = OtpConfig::default();
        let mut config = OtpConfig::new(self.otp_length.unwrap_or(defaults.otp_length()))?;
        if let Some(delay_ms) = self.auto_submit_delay_ms {
            config = config.with_auto_submit_delay(Duration::from_millis(delay_ms));
        }
        if let Some(prefill) = &self.prefill {
            config = config.with_prefill(prefill.clone());
        }
        if let Some(reset_order) = self.reset_order {
            config = config.with_reset_order(reset_order);
        }
        Ok(config)
    }
}

/// Thread-safe settings store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserSettings {
    path: PathBuf,
    payload: Mutex<SettingsPayload>,
    persist_to_disk: bool,
}

impl UserSettings {
    /// Open the store at the default path (or `OTP_ENTRY_SETTINGS_PATH`).
    pub fn new() -> Result<Self, SettingsError> {
        Self::from_path(default_settings_path())
    }

    /// Open the store rooted at `path`. A missing file yields defaults.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(SettingsPayload::default()),
            persist_to_disk: false,
        }
    }

    /// Whether `update` writes through to the settings file.
    pub fn is_persistent(&self) -> bool {
        self.persist_to_disk
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> SettingsPayload {
        self.payload.lock().expect("settings lock poisoned").clone()
    }

    pub fn preferred_theme(&self) -> Option<String> {
        self.payload.lock().expect("settings lock poisoned").preferred_theme.clone()
    }

    /// Apply `change` to the stored values and persist the result.
    pub fn update(&self, change: impl FnOnce(&mut SettingsPayload)) -> Result<(), SettingsError> {
        let mut payload = self.payload.lock().expect("settings lock poisoned");
        change(&mut payload);
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    fn save_locked(&self, payload: &SettingsPayload) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = env::var(SETTINGS_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("otp-entry")
        .join(SETTINGS_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<SettingsPayload, SettingsError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse settings file; using defaults"
                );
                Ok(SettingsPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(SettingsPayload::default()),
        Err(error) => Err(SettingsError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = UserSettings::from_path(dir.path().join("settings.json")).unwrap();
        assert_eq!(settings.snapshot(), SettingsPayload::default());
        assert_eq!(settings.snapshot().otp_config().unwrap(), OtpConfig::default());
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = UserSettings::from_path(&path).unwrap();
        settings
            .update(|payload| {
                payload.otp_length = Some(6);
                payload.auto_submit_delay_ms = Some(250);
                payload.reset_order = Some(ResetOrder::BeforeCallback);
                payload.preferred_theme = Some("nord".into());
            })
            .unwrap();
        drop(settings);

        let reloaded = UserSettings::from_path(&path).unwrap();
        assert_eq!(reloaded.preferred_theme().as_deref(), Some("nord"));
        let config = reloaded.snapshot().otp_config().unwrap();
        assert_eq!(config.otp_length(), 6);
        assert_eq!(config.auto_submit_delay(), Duration::from_millis(250));
        assert_eq!(config.reset_order(), ResetOrder::BeforeCallback);
    }

    #[test]
    fn invalid_json_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let settings = UserSettings::from_path(&path).unwrap();
        assert_eq!(settings.snapshot(), SettingsPayload::default());
    }

    #[test]
    fn partial_payload_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "prefill": "12" }"#).unwrap();
        let config = UserSettings::from_path(&path).unwrap().snapshot().otp_config().unwrap();
        assert_eq!(config.otp_length(), 5);
        assert_eq!(config.prefill(), Some("12"));
    }

    #[test]
    fn zero_length_is_rejected() {
        let payload = SettingsPayload {
            otp_length: Some(0),
            ..SettingsPayload::default()
        };
        assert_eq!(payload.otp_config(), Err(OtpError::InvalidLength { length: 0 }));
    }

    #[test]
    fn ephemeral_store_never_touches_disk() {
        let settings = UserSettings::ephemeral();
        settings.update(|payload| payload.otp_length = Some(4)).unwrap();
        assert_eq!(settings.snapshot().otp_length, Some(4));
        assert_eq!(settings.path(), Path::new(""));
        assert!(!settings.is_persistent());
    }

    #[test]
    fn directory_path_surfaces_io_error() {
        let dir = tempdir().unwrap();
        let result = UserSettings::from_path(dir.path());
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }

    #[test]
    fn default_path_honors_env_override() {
        temp_env::with_var(SETTINGS_PATH_ENV, Some("/tmp/otp-entry/custom.json"), || {
            assert_eq!(default_settings_path(), PathBuf::from("/tmp/otp-entry/custom.json"));
        });
    }
}
