use std::env;
use std::path::PathBuf;

use dirs_next::{data_local_dir, home_dir};

/// Environment variable overriding where the log file is written.
pub const LOG_PATH_ENV: &str = "OTP_ENTRY_LOG_PATH";

/// Default filename for the log file.
pub const LOG_FILE_NAME: &str = "otp-entry.log";

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Resolves the log file path: `OTP_ENTRY_LOG_PATH` when set, otherwise the
/// platform's local data directory.
pub fn resolve_log_path() -> PathBuf {
    if let Some(path) = env::var_os(LOG_PATH_ENV)
        && !path.is_empty()
    {
        return expand_tilde(&path.to_string_lossy());
    }

    data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("otp-entry")
        .join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde(" ~/logs/a.log "), home.join("logs/a.log"));
        assert_eq!(expand_tilde("/var/tmp/a.log"), PathBuf::from("/var/tmp/a.log"));
    }

    #[test]
    fn log_path_honors_env_override() {
        temp_env::with_var(LOG_PATH_ENV, Some("/tmp/otp-entry-test.log"), || {
            assert_eq!(resolve_log_path(), PathBuf::from("/tmp/otp-entry-test.log"));
        });
    }

    #[test]
    fn log_path_defaults_to_data_dir() {
        temp_env::with_var(LOG_PATH_ENV, None::<&str>, || {
            let path = resolve_log_path();
            assert!(path.ends_with("otp-entry/otp-entry.log"));
        });
    }
}
