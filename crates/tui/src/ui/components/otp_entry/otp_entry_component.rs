use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use otp_entry_types::{GROUP_LABEL, NavKey};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Position, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::app::{App, Effect};
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers as th;

/// Width of a single digit box, borders included.
pub const SLOT_WIDTH: u16 = 5;
/// Columns between neighbouring boxes.
pub const SLOT_GAP: u16 = 1;

/// Renders the digit boxes and translates terminal input into controller calls.
#[derive(Debug, Default)]
pub struct OtpEntryComponent {
    slot_areas: Vec<Rect>,
}

impl OtpEntryComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_at(&self, column: u16, row: u16) -> Option<usize> {
        let position = Position::new(column, row);
        self.slot_areas.iter().position(|area| area.contains(position))
    }

    fn handle_slot_key(app: &mut App, index: usize, key: KeyEvent) {
        let current = app.otp.slot_text(index);
        let controller = app.otp.controller_mut();
        match key.code {
            KeyCode::Char(typed) => {
                controller.handle_key_navigation(NavKey::Other, index, &current);
                controller.handle_digit_input(&format!("{current}{typed}"), index);
            }
            KeyCode::Backspace => {
                controller.handle_key_navigation(NavKey::Backspace, index, &current);
                if !current.is_empty() {
                    controller.handle_digit_input("", index);
                }
            }
            KeyCode::Delete => controller.handle_digit_input("", index),
            KeyCode::Left => controller.handle_key_navigation(NavKey::ArrowLeft, index, &current),
            KeyCode::Right => controller.handle_key_navigation(NavKey::ArrowRight, index, &current),
            _ => controller.handle_key_navigation(NavKey::Other, index, &current),
        }
    }
}

impl Component for OtpEntryComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('v') {
                return vec![Effect::PasteFromClipboard];
            }
            return Vec::new();
        }

        match key.code {
            KeyCode::Esc => return vec![Effect::Exit],
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        if let Some(index) = app.otp.focused_slot() {
            Self::handle_slot_key(app, index, key);
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && let Some(index) = self.slot_at(mouse.column, mouse.row)
            && let Some(flag) = app.otp.slot_flag(index)
        {
            app.focus.focus(flag);
        }
        Vec::new()
    }

    fn handle_paste(&mut self, app: &mut App, text: &str) -> Vec<Effect> {
        app.otp.controller_mut().handle_paste(text);
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let group = th::block(theme, Some(GROUP_LABEL), app.otp.focused_slot().is_some());
        let inner = group.inner(rect);
        frame.render_widget(group, rect);

        let areas = Layout::horizontal(vec![Constraint::Length(SLOT_WIDTH); app.otp.len()])
            .spacing(SLOT_GAP)
            .flex(Flex::Center)
            .split(inner);
        self.slot_areas = areas.to_vec();

        for (index, area) in areas.iter().enumerate() {
            let focused = app.otp.is_slot_focused(index);
            let value = app.otp.controller().slot_value(index);
            let slot_block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(theme.border_style(focused));
            let paragraph = Paragraph::new(value.map(String::from).unwrap_or_default())
                .centered()
                .style(th::slot_style(theme, value.is_some(), focused))
                .block(slot_block);
            frame.render_widget(paragraph, *area);

            if focused && area.height > 2 {
                frame.set_cursor_position(Position::new(area.x + area.width / 2, area.y + 1));
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let theme = &*app.theme;
        let mut spans = Vec::new();
        if let Some(index) = app.otp.focused_slot() {
            spans.push(Span::styled(app.otp.controller().slot_label(index), theme.text_secondary_style()));
            spans.push(Span::raw("  "));
        }
        spans.extend(th::build_hint_spans(
            theme,
            &[
                ("0-9", " digit  "),
                ("←/→", " move  "),
                ("Tab", " next  "),
                ("Ctrl+V", " paste  "),
                ("Esc", " quit"),
            ],
        ));
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppChannels, TuiOptions};
    use otp_entry_types::OtpConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn mounted_app(config: OtpConfig) -> (App, AppChannels) {
        let options = TuiOptions {
            config,
            ..TuiOptions::default()
        };
        let (mut app, channels) = App::new(options).expect("app");
        app.mount();
        (app, channels)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(component: &mut OtpEntryComponent, app: &mut App, text: &str) {
        for typed in text.chars() {
            component.handle_key_events(app, press(KeyCode::Char(typed)));
        }
    }

    fn draw(component: &mut OtpEntryComponent, app: &mut App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).expect("terminal");
        terminal
            .draw(|frame| component.render(frame, frame.area(), app))
            .expect("draw");
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn typing_advances_focus_and_fills_slots() {
        let (mut app, _channels) = mounted_app(OtpConfig::default());
        let mut component = OtpEntryComponent::new();

        type_text(&mut component, &mut app, "123");

        assert_eq!(app.otp.controller().code(), "123");
        assert_eq!(app.otp.focused_slot(), Some(3));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn letters_are_ignored_and_typing_over_a_digit_replaces_it() {
        let (mut app, _channels) = mounted_app(OtpConfig::default());
        let mut component = OtpEntryComponent::new();

        type_text(&mut component, &mut app, "a");
        assert!(app.otp.controller().buffer().is_empty());
        assert_eq!(app.otp.focused_slot(), Some(0));

        type_text(&mut component, &mut app, "4");
        component.handle_key_events(&mut app, press(KeyCode::Left));
        assert_eq!(app.otp.focused_slot(), Some(0));
        type_text(&mut component, &mut app, "7");
        assert_eq!(app.otp.controller().slot_value(0), Some('7'));
        assert_eq!(app.otp.focused_slot(), Some(1));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn backspace_clears_then_moves_left() {
        let (mut app, _channels) = mounted_app(OtpConfig::default());
        let mut component = OtpEntryComponent::new();
        type_text(&mut component, &mut app, "12");
        component.handle_key_events(&mut app, press(KeyCode::Left));
        assert_eq!(app.otp.focused_slot(), Some(1));

        component.handle_key_events(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.otp.controller().slot_value(1), None);
        assert_eq!(app.otp.focused_slot(), Some(1));

        component.handle_key_events(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.otp.focused_slot(), Some(0));
        assert_eq!(app.otp.controller().slot_value(0), Some('1'));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn paste_fills_slots_and_arms_submit() {
        let (mut app, _channels) = mounted_app(OtpConfig::default());
        let mut component = OtpEntryComponent::new();

        component.handle_paste(&mut app, "12-34-5");

        assert_eq!(app.otp.controller().code(), "12345");
        assert_eq!(app.otp.focused_slot(), Some(4));
        assert!(app.otp.controller().pending_ticket().is_some());
    }

    #[test]
    fn control_v_requests_clipboard_and_escape_exits() {
        let (mut app, _channels) = mounted_app(OtpConfig::default());
        let mut component = OtpEntryComponent::new();

        let paste = KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert_eq!(component.handle_key_events(&mut app, paste), vec![Effect::PasteFromClipboard]);
        assert_eq!(component.handle_key_events(&mut app, press(KeyCode::Esc)), vec![Effect::Exit]);
        assert!(app.otp.controller().buffer().is_empty());
    }

    #[test]
    fn tab_cycles_through_slots() {
        let (mut app, _channels) = mounted_app(OtpConfig::new(3).unwrap());
        let mut component = OtpEntryComponent::new();

        component.handle_key_events(&mut app, press(KeyCode::Tab));
        assert_eq!(app.otp.focused_slot(), Some(1));
        component.handle_key_events(&mut app, KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(app.otp.focused_slot(), Some(0));
    }

    #[test]
    fn render_shows_group_label_and_digits() {
        let config = OtpConfig::new(4).unwrap().with_prefill("98");
        let (mut app, _channels) = mounted_app(config);
        let mut component = OtpEntryComponent::new();

        let terminal = draw(&mut component, &mut app);
        let text = screen_text(&terminal);

        assert!(text.contains(GROUP_LABEL));
        assert!(text.contains('9'));
        assert!(text.contains('8'));
        assert_eq!(component.slot_areas.len(), 4);
        assert!(component.slot_areas.iter().all(|area| area.width == SLOT_WIDTH));
    }

    #[test]
    fn clicking_a_slot_focuses_it() {
        let (mut app, _channels) = mounted_app(OtpConfig::default());
        let mut component = OtpEntryComponent::new();
        draw(&mut component, &mut app);

        let target = component.slot_areas[3];
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: target.x + 1,
            row: target.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        component.handle_mouse_events(&mut app, click);

        assert_eq!(app.otp.focused_slot(), Some(3));
    }

    #[test]
    fn hints_lead_with_the_focused_slot_label() {
        let (app, _channels) = mounted_app(OtpConfig::default());
        let component = OtpEntryComponent::new();

        let spans = component.get_hint_spans(&app);

        assert_eq!(spans[0].content, "Digit 1 of 5");
    }
}
