//! Component system for the OTP entry TUI.
//!
//! Components are self-contained UI elements that handle their own events
//! and rendering while integrating with the application through a consistent
//! interface: they mutate `App` state directly and report anything the
//! runtime must do (exit, read the clipboard) as `Effect`s.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::{App, Effect, Msg};

/// A trait representing a UI component with its own state and behavior.
///
/// # Component Lifecycle
///
/// 1. **Event Handling**: the runtime routes key, mouse, and paste events
///    through `handle_key_events()`, `handle_mouse_events()`, and
///    `handle_paste()`
/// 2. **Messages**: timer and channel deliveries arrive via `handle_message()`
/// 3. **Rendering**: `render()` draws the component into the provided area
pub(crate) trait Component {
    /// Handle an application message such as a due submit ticket.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle text pasted into the terminal (bracketed paste) or read from
    /// the system clipboard.
    fn handle_paste(&mut self, _app: &mut App, _text: &str) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing,
    /// cursor placement, and caching hit-test areas.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the footer while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }
}
