//! Application state and logic for the OTP entry TUI.
//!
//! `App` owns the OTP widget state, the focus ring, the resolved theme, and
//! the verification status line. The runtime feeds it messages (due submit
//! tickets, submitted codes, status expiry) and components mutate it in
//! response to terminal input.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use otp_entry_engine::{OtpEntryController, TokioScheduler};
use otp_entry_types::{OtpConfig, SubmitTicket, Verdict};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::ui::components::otp_entry::OtpEntryState;
use crate::ui::theme::{self, Theme};

/// How long a verification result stays on screen.
pub const STATUS_DURATION: Duration = Duration::from_secs(2);

/// Code accepted by the stock verifier.
pub const DEFAULT_EXPECTED_CODE: &str = "12345";

/// Decides whether a submitted code is correct.
pub trait CodeVerifier {
    fn verify(&mut self, code: &str) -> Verdict;
}

/// Accepts exactly one code.
pub struct ExpectedCode(String);

impl ExpectedCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl Default for ExpectedCode {
    fn default() -> Self {
        Self::new(DEFAULT_EXPECTED_CODE)
    }
}

impl fmt::Debug for ExpectedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpectedCode").field(&"<redacted>").finish()
    }
}

impl CodeVerifier for ExpectedCode {
    fn verify(&mut self, code: &str) -> Verdict {
        if code == self.0 { Verdict::Accepted } else { Verdict::Rejected }
    }
}

/// Everything the host needs to start.
pub struct TuiOptions {
    pub config: OtpConfig,
    pub preferred_theme: Option<String>,
    pub verifier: Box<dyn CodeVerifier>,
    /// Muted line under the widget, e.g. naming the demo code.
    pub demo_hint: Option<String>,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            config: OtpConfig::default(),
            preferred_theme: None,
            verifier: Box::new(ExpectedCode::default()),
            demo_hint: Some(format!("Try: {DEFAULT_EXPECTED_CODE}")),
        }
    }
}

/// Messages delivered to the application by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A scheduled auto-submit timer elapsed.
    SubmitDue(SubmitTicket),
    /// The widget reported a completed code.
    CodeSubmitted(String),
    /// The status line deadline passed.
    StatusExpired,
    /// Terminal resized.
    Resize(u16, u16),
}

/// Side effects the runtime performs on behalf of components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Exit,
    PasteFromClipboard,
}

/// Transient line shown under the widget after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub verdict: Verdict,
    pub text: &'static str,
    pub expires_at: Instant,
}

impl StatusMessage {
    fn for_verdict(verdict: Verdict) -> Self {
        let text = match verdict {
            Verdict::Accepted => "OTP verified successfully",
            Verdict::Rejected => "Invalid OTP",
        };
        Self {
            verdict,
            text,
            expires_at: Instant::now() + STATUS_DURATION,
        }
    }
}

/// Receivers the runtime polls alongside terminal input.
pub struct AppChannels {
    pub tickets: UnboundedReceiver<SubmitTicket>,
    pub submissions: UnboundedReceiver<String>,
}

pub struct App {
    pub otp: OtpEntryState,
    pub theme: Box<dyn Theme>,
    pub focus: Rc<Focus>,
    pub status: Option<StatusMessage>,
    pub demo_hint: Option<String>,
    verifier: Box<dyn CodeVerifier>,
    container_focus: FocusFlag,
}

impl App {
    /// Builds the controller, registers its slots, and resolves the theme.
    pub fn new(options: TuiOptions) -> Result<(Self, AppChannels)> {
        let TuiOptions {
            config,
            preferred_theme,
            verifier,
            demo_hint,
        } = options;

        let (scheduler, tickets) = TokioScheduler::new();
        let (submit_sender, submissions) = unbounded_channel();
        let controller = OtpEntryController::new(&config, scheduler, move |code: &str| {
            if submit_sender.send(code.to_string()).is_err() {
                warn!("submission receiver dropped; code discarded");
            }
        });
        let otp = OtpEntryState::new(controller)?;

        let loaded = theme::load(preferred_theme.as_deref());
        debug!(theme = loaded.definition.id, "theme selected");

        let app = Self {
            otp,
            theme: loaded.theme,
            focus: Rc::new(Focus::default()),
            status: None,
            demo_hint,
            verifier,
            container_focus: FocusFlag::new().with_name("root"),
        };
        Ok((app, AppChannels { tickets, submissions }))
    }

    /// Mounts the widget and builds the initial focus ring.
    pub fn mount(&mut self) {
        self.otp.controller_mut().mount();
        self.rebuild_focus();
    }

    /// Rebuilds the focus ring, keeping the currently focused slot.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        let focus = FocusBuilder::rebuild_for(&*self, Some(Rc::unwrap_or_clone(old_focus)));
        self.focus = Rc::new(focus);
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::SubmitDue(ticket) => {
                self.otp.controller_mut().fire(ticket);
            }
            Msg::CodeSubmitted(code) => {
                let verdict = self.verifier.verify(&code);
                info!(?verdict, digits = code.len(), "code submitted");
                self.status = Some(StatusMessage::for_verdict(verdict));
            }
            Msg::StatusExpired => {
                if self.status.as_ref().is_some_and(|status| status.expires_at <= Instant::now()) {
                    self.status = None;
                }
            }
            Msg::Resize(..) => {}
        }
        Vec::new()
    }

    /// Deadline the runtime should wake at to clear the status line.
    pub fn status_deadline(&self) -> Option<Instant> {
        self.status.as_ref().map(|status| status.expires_at)
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        builder.widget(&self.otp);
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otp_entry_types::ResetOrder;

    fn app_with(config: OtpConfig) -> (App, AppChannels) {
        let options = TuiOptions {
            config,
            ..TuiOptions::default()
        };
        App::new(options).expect("app")
    }

    fn type_code(app: &mut App, code: &str) {
        for (index, digit) in code.chars().enumerate() {
            app.otp.controller_mut().handle_digit_input(&digit.to_string(), index);
        }
    }

    #[test]
    fn expected_code_verifier_matches_exactly() {
        let mut verifier = ExpectedCode::new("12345");
        assert_eq!(verifier.verify("12345"), Verdict::Accepted);
        assert_eq!(verifier.verify("12346"), Verdict::Rejected);
        assert_eq!(verifier.verify("1234"), Verdict::Rejected);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn completed_code_is_verified_after_the_delay() {
        let (mut app, mut channels) = app_with(OtpConfig::default());
        app.mount();
        type_code(&mut app, "12345");

        let ticket = channels.tickets.recv().await.expect("ticket");
        app.update(Msg::SubmitDue(ticket));

        let code = channels.submissions.try_recv().expect("submitted code");
        assert_eq!(code, "12345");
        assert!(app.otp.controller().buffer().is_empty());
        assert_eq!(app.otp.focused_slot(), Some(4));

        app.update(Msg::CodeSubmitted(code));
        let status = app.status.as_ref().expect("status");
        assert_eq!(status.verdict, Verdict::Accepted);
        assert_eq!(status.text, "OTP verified successfully");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn wrong_code_reports_invalid() {
        let config = OtpConfig::default().with_reset_order(ResetOrder::BeforeCallback);
        let (mut app, mut channels) = app_with(config);
        app.mount();
        type_code(&mut app, "99999");

        let ticket = channels.tickets.recv().await.expect("ticket");
        app.update(Msg::SubmitDue(ticket));
        let code = channels.submissions.try_recv().expect("submitted code");
        app.update(Msg::CodeSubmitted(code));

        assert_eq!(app.status.as_ref().map(|status| status.text), Some("Invalid OTP"));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn status_clears_only_after_its_deadline() {
        let (mut app, _channels) = app_with(OtpConfig::default());
        app.update(Msg::CodeSubmitted("12345".into()));

        tokio::time::advance(Duration::from_millis(1500)).await;
        app.update(Msg::StatusExpired);
        assert!(app.status.is_some());

        tokio::time::advance(Duration::from_millis(600)).await;
        app.update(Msg::StatusExpired);
        assert!(app.status.is_none());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn stale_ticket_does_not_submit() {
        let (mut app, mut channels) = app_with(OtpConfig::default());
        app.mount();
        type_code(&mut app, "12345");
        let first = app.otp.controller().pending_ticket().expect("armed");

        app.otp.controller_mut().handle_digit_input("6", 4);
        app.update(Msg::SubmitDue(first));
        assert!(channels.submissions.try_recv().is_err());

        let ticket = channels.tickets.recv().await.expect("ticket");
        assert_ne!(ticket, first);
        app.update(Msg::SubmitDue(ticket));
        assert_eq!(channels.submissions.try_recv().ok().as_deref(), Some("12346"));
    }

    #[test]
    fn mount_builds_focus_ring_on_first_slot() {
        let (mut app, _channels) = app_with(OtpConfig::new(3).unwrap());
        app.mount();
        assert_eq!(app.otp.focused_slot(), Some(0));
        app.focus.next();
        assert_eq!(app.otp.focused_slot(), Some(1));
    }
}
