use super::{Ansi256Theme, DraculaTheme, NordTheme, Theme};

/// Describes a selectable theme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    /// Canonical identifier used for persistence.
    pub id: &'static str,
    /// Theme aliases (e.g., env overrides) that map back to this definition.
    pub aliases: &'static [&'static str],
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    /// Instantiate the theme represented by this definition.
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

const DRACULA: ThemeDefinition = ThemeDefinition {
    id: "dracula",
    aliases: &["dracula"],
    factory: || Box::new(DraculaTheme::new()),
};

const NORD: ThemeDefinition = ThemeDefinition {
    id: "nord",
    aliases: &["nord"],
    factory: || Box::new(NordTheme::new()),
};

const ANSI256: ThemeDefinition = ThemeDefinition {
    id: "ansi256",
    aliases: &["ansi256", "ansi", "256"],
    factory: || Box::new(Ansi256Theme::new()),
};

/// Ordered list of available themes.
pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[DRACULA, NORD, ANSI256];

/// Locate a definition by alias or id (case-insensitive).
pub fn resolve(name: &str) -> Option<&'static ThemeDefinition> {
    THEME_DEFINITIONS.iter().find(|definition| {
        definition.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name)) || definition.id.eq_ignore_ascii_case(name)
    })
}

/// Preferred default for truecolor terminals.
pub fn default_truecolor() -> &'static ThemeDefinition {
    &DRACULA
}

/// Preferred default for ANSI-only terminals.
pub fn default_ansi() -> &'static ThemeDefinition {
    &ANSI256
}
