//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (alternate screen, raw mode, mouse capture,
//!   bracketed paste).
//! - Drive a single event loop that multiplexes terminal input, auto-submit
//!   tickets from the scheduler, completed codes, and the status deadline.
//! - Route input to `MainView` and execute returned `Effect`s.
//! - Render only after something changed.
//!
//! A dedicated blocking task reads `crossterm` events and forwards them over a
//! channel so the async loop never blocks on terminal I/O.
use std::io::Stdout;
use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::*};
use tokio::{signal, sync::mpsc, time::Instant};
use tracing::{debug, warn};

use crate::app::{App, AppChannels, Effect, Msg, TuiOptions};
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

/// Spawn a blocking task that reads terminal input and forwards `crossterm`
/// events over a Tokio channel. Exits once the receiver is dropped.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);

    tokio::task::spawn_blocking(move || {
        let poll_interval = Duration::from_millis(16);
        loop {
            match event::poll(poll_interval) {
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                }
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if sender.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!("Failed to read event: {}", error);
                        break;
                    }
                },
                Err(error) => {
                    warn!("Failed to poll for events: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, main_view: &mut MainView) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    // Rebuild focus just before rendering so the ring matches the slots on screen
    app.rebuild_focus();
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn is_exit_chord(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Route one raw crossterm event to `MainView`. Key releases and repeats
/// are dropped so a single press types a single digit.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Paste(text) => main_view.handle_paste(app, &text),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::Key(_) | Event::FocusGained | Event::FocusLost => Vec::new(),
    }
}

fn read_clipboard() -> Result<String, arboard::Error> {
    arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text())
}

/// Execute effects until none remain; `Break` means the user asked to quit.
fn process_effects(app: &mut App, main_view: &mut MainView, mut effects: Vec<Effect>) -> ControlFlow<()> {
    while !effects.is_empty() {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::Exit => return ControlFlow::Break(()),
                Effect::PasteFromClipboard => match read_clipboard() {
                    Ok(text) => follow_ups.extend(main_view.handle_paste(app, &text)),
                    Err(error) => warn!("Failed to read clipboard: {}", error),
                },
            }
        }
        effects = follow_ups;
    }
    ControlFlow::Continue(())
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    main_view: &mut MainView,
    input_receiver: &mut mpsc::Receiver<Event>,
    channels: &mut AppChannels,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    app.mount();
    render(terminal, app, main_view)?;

    loop {
        let status_deadline = app.status_deadline();
        let control = tokio::select! {
            // Terminal input events
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    debug!("input channel closed; shutting down");
                    break;
                };
                if is_exit_chord(&event) {
                    break;
                }
                let effects = handle_input_event(app, main_view, event);
                process_effects(app, main_view, effects)
            }

            // Auto-submit timer elapsed
            Some(ticket) = channels.tickets.recv() => {
                let effects = main_view.handle_message(app, Msg::SubmitDue(ticket));
                process_effects(app, main_view, effects)
            }

            // Completion callback delivered a code
            Some(code) = channels.submissions.recv() => {
                let effects = main_view.handle_message(app, Msg::CodeSubmitted(code));
                process_effects(app, main_view, effects)
            }

            _ = sleep_until_opt(status_deadline) => {
                let effects = main_view.handle_message(app, Msg::StatusExpired);
                process_effects(app, main_view, effects)
            }

            // Handle Ctrl+C
            _ = signal::ctrl_c() => { break; }
        };

        if control.is_break() {
            break;
        }
        render(terminal, app, main_view)?;
    }
    Ok(())
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the input
/// reader, runs the event loop, and restores the terminal even when the loop
/// fails.
pub async fn run_app(options: TuiOptions) -> Result<()> {
    let (mut app, mut channels) = App::new(options)?;
    let mut main_view = MainView::new();

    let mut input_receiver = spawn_input_thread();
    let mut terminal = setup_terminal()?;

    let outcome = event_loop(&mut terminal, &mut app, &mut main_view, &mut input_receiver, &mut channels).await;
    cleanup_terminal(&mut terminal)?;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use otp_entry_types::Verdict;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn harness() -> (App, AppChannels, MainView, Terminal<TestBackend>) {
        let (mut app, channels) = App::new(TuiOptions::default()).expect("app");
        let mut main_view = MainView::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).expect("terminal");
        app.mount();
        render(&mut terminal, &mut app, &mut main_view).expect("render");
        (app, channels, main_view, terminal)
    }

    #[test]
    fn ctrl_c_is_the_exit_chord() {
        assert!(is_exit_chord(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))));
        assert!(!is_exit_chord(&key(KeyCode::Char('c'))));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn key_releases_are_ignored() {
        let (mut app, _channels, mut main_view, _terminal) = harness();
        let mut release = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        handle_input_event(&mut app, &mut main_view, Event::Key(release));

        assert!(app.otp.controller().buffer().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn escape_breaks_the_loop() {
        let (mut app, _channels, mut main_view, _terminal) = harness();
        let effects = handle_input_event(&mut app, &mut main_view, key(KeyCode::Esc));
        assert!(process_effects(&mut app, &mut main_view, effects).is_break());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn bracketed_paste_fills_the_code() {
        let (mut app, _channels, mut main_view, _terminal) = harness();
        let effects = handle_input_event(&mut app, &mut main_view, Event::Paste("123 45".into()));
        assert!(process_effects(&mut app, &mut main_view, effects).is_continue());
        assert_eq!(app.otp.controller().code(), "12345");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn event_loop_submits_verifies_and_exits() {
        let (mut app, mut channels, mut main_view, mut terminal) = harness();
        let (sender, mut input_receiver) = mpsc::channel(16);
        for digit in "12345".chars() {
            sender.send(key(KeyCode::Char(digit))).await.unwrap();
        }

        let driver = async {
            // Let the loop drain the keys, wait out the submit delay, then quit.
            tokio::time::sleep(Duration::from_millis(600)).await;
            sender.send(key(KeyCode::Esc)).await.unwrap();
        };
        let (outcome, ()) = tokio::join!(
            event_loop(&mut terminal, &mut app, &mut main_view, &mut input_receiver, &mut channels),
            driver
        );

        outcome.expect("loop");
        let status = app.status.as_ref().expect("status");
        assert_eq!(status.verdict, Verdict::Accepted);
        assert!(app.otp.controller().buffer().is_empty());
        assert_eq!(app.otp.focused_slot(), Some(4));
    }

    #[test]
    fn render_draws_title_and_group() {
        let (_app, _channels, _main_view, terminal) = harness();
        let text: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("OTP Verification"));
        assert!(text.contains("Enter verification code"));
    }
}
