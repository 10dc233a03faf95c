use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use otp_entry_types::ResetOrder;
use otp_entry_tui::{DEFAULT_EXPECTED_CODE, ExpectedCode, TuiOptions};
use otp_entry_util::{SettingsPayload, UserSettings, resolve_log_path};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Segmented one-time-code entry in the terminal.
///
/// Flags override values from the settings file, which override built-in
/// defaults.
#[derive(Debug, Parser)]
#[command(name = "otp-entry", version, about)]
struct Args {
    /// Number of digit boxes (1-32)
    #[arg(long, value_name = "N")]
    length: Option<usize>,

    /// Delay between the last digit and submission, in milliseconds
    #[arg(long = "delay-ms", value_name = "MS")]
    delay_ms: Option<u64>,

    /// Digits placed in the boxes at startup
    #[arg(long, value_name = "DIGITS")]
    prefill: Option<String>,

    /// Code the verifier accepts
    #[arg(long, value_name = "CODE")]
    expected: Option<String>,

    /// Clear the boxes before reporting the code instead of after
    #[arg(long)]
    reset_before_callback: bool,

    /// Theme name (dracula, nord, ansi256)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Settings file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save: bool,
}

impl Args {
    /// Overlays command-line values onto `payload`.
    fn apply_to(&self, payload: &mut SettingsPayload) {
        if let Some(length) = self.length {
            payload.otp_length = Some(length);
        }
        if let Some(delay_ms) = self.delay_ms {
            payload.auto_submit_delay_ms = Some(delay_ms);
        }
        if let Some(prefill) = &self.prefill {
            payload.prefill = Some(prefill.clone());
        }
        if let Some(expected) = &self.expected {
            payload.expected_code = Some(expected.clone());
        }
        if self.reset_before_callback {
            payload.reset_order = Some(ResetOrder::BeforeCallback);
        }
        if let Some(theme) = &self.theme {
            payload.preferred_theme = Some(theme.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let settings = load_settings(args.config.as_deref());
    let mut payload = settings.snapshot();
    args.apply_to(&mut payload);

    let config = payload.otp_config().context("invalid OTP settings")?;
    if args.save {
        save_settings(&settings, &payload)?;
    }

    let demo_hint = payload
        .expected_code
        .is_none()
        .then(|| format!("Try: {DEFAULT_EXPECTED_CODE}"));
    let expected = payload.expected_code.unwrap_or_else(|| DEFAULT_EXPECTED_CODE.to_string());
    let options = TuiOptions {
        config,
        preferred_theme: payload.preferred_theme,
        verifier: Box::new(ExpectedCode::new(expected)),
        demo_hint,
    };
    otp_entry_tui::run(options).await
}

/// Logs go to a file so they never draw over the TUI.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let path = resolve_log_path();
    match open_log_file(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(error) => eprintln!("otp-entry: logging disabled, cannot open {}: {error}", path.display()),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn load_settings(explicit_path: Option<&Path>) -> UserSettings {
    let loaded = match explicit_path {
        Some(path) => UserSettings::from_path(path),
        None => UserSettings::new(),
    };
    loaded.unwrap_or_else(|error| {
        warn!(error = %error, "settings unavailable; using defaults for this session");
        UserSettings::ephemeral()
    })
}

/// Writes `payload` to the settings file. Returns `false` when the store is
/// in-memory and nothing reached disk.
fn save_settings(settings: &UserSettings, payload: &SettingsPayload) -> Result<bool> {
    if !settings.is_persistent() {
        warn!("settings store is in-memory; nothing was saved");
        return Ok(false);
    }
    let saved = payload.clone();
    settings
        .update(move |stored| *stored = saved)
        .with_context(|| format!("failed to save settings to {}", settings.path().display()))?;
    info!(path = %settings.path().display(), "settings saved");
    Ok(true)
}
