//! Theme styling module for the TUI UI layer.
//!
//! This module defines the color palettes (Dracula, Nord), an ANSI 256-color
//! fallback, semantic theme roles, and helper builders for Ratatui widgets
//! and styles. Prefer these helpers over hard-coding colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod catalog;
pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::Ansi256Theme;
pub use catalog::ThemeDefinition;
pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable naming the theme to use.
pub const THEME_ENV: &str = "OTP_ENTRY_THEME";

/// Theme plus metadata describing how it was selected.
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    pub fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme from `OTP_ENTRY_THEME`, then the saved preference, then
/// terminal capabilities.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    if let Ok(theme_name) = env::var(THEME_ENV)
        && let Some(definition) = catalog::resolve(theme_name.trim())
    {
        return LoadedTheme::from_definition(definition);
    }

    if let Some(name) = preferred_theme
        && let Some(definition) = catalog::resolve(name.trim())
    {
        return LoadedTheme::from_definition(definition);
    }

    if matches!(detect_color_capability(), ColorCapability::Ansi256) {
        debug!("ANSI-only terminal detected; using fallback palette.");
        return LoadedTheme::from_definition(catalog::default_ansi());
    }

    LoadedTheme::from_definition(catalog::default_truecolor())
}

fn detect_color_capability() -> ColorCapability {
    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") || term.contains("direct") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_beats_preference() {
        temp_env::with_var(THEME_ENV, Some("nord"), || {
            assert_eq!(load(Some("dracula")).definition.id, "nord");
        });
    }

    #[test]
    fn preference_beats_capability_detection() {
        temp_env::with_vars([(THEME_ENV, None::<&str>), ("COLORTERM", None), ("TERM", Some("xterm-256color"))], || {
            assert_eq!(load(Some("Nord")).definition.id, "nord");
            assert_eq!(load(None).definition.id, "ansi256");
        });
    }

    #[test]
    fn truecolor_terminals_get_the_default_palette() {
        temp_env::with_vars([(THEME_ENV, None::<&str>), ("COLORTERM", Some("truecolor"))], || {
            assert_eq!(load(Some("unknown")).definition.id, "dracula");
        });
    }
}
