use crossterm::event::{KeyEvent, MouseEvent};
use otp_entry_types::Verdict;
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{Block, Paragraph},
};

use super::components::Component;
use super::components::otp_entry::{OtpEntryComponent, SLOT_GAP, SLOT_WIDTH};
use super::theme::theme_helpers as th;
use crate::app::{App, Effect, Msg};

const TITLE: &str = "OTP Verification";
const PENDING_TEXT: &str = "Verifying…";

/// Columns the group box needs: slots, gaps, borders, and one column of
/// padding on each side. Never narrower than its title.
fn group_width(length: usize) -> u16 {
    let length = u16::try_from(length).unwrap_or(u16::MAX);
    let slots = length.saturating_mul(SLOT_WIDTH);
    let gaps = length.saturating_sub(1).saturating_mul(SLOT_GAP);
    let label = u16::try_from(otp_entry_types::GROUP_LABEL.len()).unwrap_or(u16::MAX);
    slots.saturating_add(gaps).max(label).saturating_add(4)
}

/// Top-level screen: title, the OTP group, the status line, and key hints.
#[derive(Debug)]
pub struct MainView {
    otp_view: OtpEntryComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self {
            otp_view: OtpEntryComponent::new(),
        }
    }

    pub fn restore_focus(&mut self, app: &mut App) {
        app.focus.first();
    }

    /// The last verdict while it is fresh, otherwise a pending notice while
    /// the auto-submit timer is armed.
    fn render_status(frame: &mut Frame, area: Rect, app: &App) {
        let (text, style) = match app.status.as_ref() {
            Some(status) => match status.verdict {
                Verdict::Accepted => (status.text, app.theme.status_success()),
                Verdict::Rejected => (status.text, app.theme.status_error()),
            },
            None if app.otp.controller().pending_ticket().is_some() => (PENDING_TEXT, app.theme.status_info()),
            None => return,
        };
        frame.render_widget(Paragraph::new(text).style(style).centered(), area);
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        self.otp_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        self.otp_view.handle_mouse_events(app, mouse)
    }

    fn handle_paste(&mut self, app: &mut App, text: &str) -> Vec<Effect> {
        self.otp_view.handle_paste(app, text)
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        frame.render_widget(Block::default().style(th::screen_style(&*app.theme)), rect);

        let [_, title_area, _, group_row, _, status_area, demo_hint_area, _, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(rect);

        frame.render_widget(
            Paragraph::new(TITLE).style(app.theme.accent_emphasis_style()).centered(),
            title_area,
        );

        let width = group_width(app.otp.len()).min(group_row.width);
        let [group_area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(group_row);
        self.otp_view.render(frame, group_area, app);

        Self::render_status(frame, status_area, app);

        if let Some(demo_hint) = app.demo_hint.as_deref() {
            frame.render_widget(
                Paragraph::new(demo_hint).style(app.theme.text_muted_style()).centered(),
                demo_hint_area,
            );
        }

        let hints = self.get_hint_spans(app);
        frame.render_widget(Paragraph::new(Line::from(hints)).centered(), hints_area);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        self.otp_view.get_hint_spans(app)
    }
}
