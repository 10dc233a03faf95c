use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::Theme;

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Backdrop filling the whole terminal behind the centered panels.
pub fn screen_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let roles = theme.roles();
    Style::default().bg(roles.background).fg(roles.text)
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let roles = theme.roles();
    Style::default().bg(roles.surface).fg(roles.text)
}

/// Style for the digit inside a slot box.
pub fn slot_style<T: Theme + ?Sized>(theme: &T, filled: bool, focused: bool) -> Style {
    let roles = theme.roles();
    let mut style = Style::default().fg(roles.text).add_modifier(Modifier::BOLD);
    if filled {
        style = style.bg(roles.slot_filled_bg);
    }
    if focused {
        style = style.fg(roles.accent_primary);
    }
    style
}

/// Render `(key, description)` pairs as hint spans: keys emphasized,
/// descriptions muted.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_emphasis_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}
