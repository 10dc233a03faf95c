//! The OTP entry state machine.
//!
//! [`OtpEntryController`] owns the digit buffer, the focus handles the
//! rendering layer registered for each slot, and the single pending
//! auto-submit timer. The rendering layer binds three handlers to every slot:
//!
//! - [`OtpEntryController::handle_digit_input`] for value changes,
//! - [`OtpEntryController::handle_key_navigation`] for key presses,
//! - [`OtpEntryController::handle_paste`] for clipboard pastes.
//!
//! After every buffer mutation the controller re-evaluates completion. A full
//! buffer arms a timer through the [`Scheduler`]; any further mutation
//! cancels it, and rearms it if the buffer is still full. When the owner
//! feeds the current ticket back through [`OtpEntryController::fire`], the
//! completion callback receives the joined code and the buffer is cleared.

use std::time::Duration;

use otp_entry_types::{EntryState, NavKey, OtpConfig, OtpError, ResetOrder, SubmitTicket, slot_label};
use tracing::{debug, warn};

use crate::buffer::CodeBuffer;
use crate::focus::SlotFocus;
use crate::scheduler::Scheduler;

/// Callback receiving the assembled code once per completion episode.
pub type CompletionCallback = Box<dyn FnMut(&str)>;

struct PendingSubmit<T> {
    ticket: SubmitTicket,
    timer: T,
    code: String,
}

/// Toolkit-agnostic controller for a row of single-digit boxes.
pub struct OtpEntryController<S: Scheduler, H: SlotFocus> {
    buffer: CodeBuffer,
    handles: Vec<Option<H>>,
    scheduler: S,
    pending: Option<PendingSubmit<S::Handle>>,
    last_ticket: SubmitTicket,
    auto_submit_delay: Duration,
    reset_order: ResetOrder,
    on_complete: CompletionCallback,
    mounted: bool,
}

impl<S: Scheduler, H: SlotFocus> OtpEntryController<S, H> {
    /// Creates a controller with an empty (or pre-filled) buffer.
    ///
    /// Nothing is focused and no timer is armed until [`Self::mount`] runs,
    /// which the rendering layer calls once its slot handles are registered.
    pub fn new(config: &OtpConfig, scheduler: S, on_complete: impl FnMut(&str) + 'static) -> Self {
        let mut buffer = CodeBuffer::new(config.otp_length());
        if let Some(prefill) = config.prefill() {
            let written = buffer.overwrite_from(prefill);
            debug!(written, "buffer pre-filled from configuration");
        }
        Self {
            buffer,
            handles: (0..config.otp_length()).map(|_| None).collect(),
            scheduler,
            pending: None,
            last_ticket: SubmitTicket::new(0),
            auto_submit_delay: config.auto_submit_delay(),
            reset_order: config.reset_order(),
            on_complete: Box::new(on_complete),
            mounted: false,
        }
    }

    /// Registers the focusable handle for slot `index`, replacing any earlier one.
    pub fn register_slot(&mut self, index: usize, handle: H) -> Result<(), OtpError> {
        let length = self.len();
        let slot = self.handles.get_mut(index).ok_or(OtpError::SlotOutOfRange { index, length })?;
        *slot = Some(handle);
        Ok(())
    }

    /// Focuses the first slot and evaluates completion for a pre-filled
    /// buffer. Only the first call has any effect.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.focus_slot(0);
        if self.buffer.is_full() {
            self.arm();
        }
    }

    /// Applies the raw value of slot `index` after a change event.
    ///
    /// Only the last character is kept. A non-digit last character makes the
    /// call a no-op. A stored digit advances focus unless `index` is the last
    /// slot; an empty value clears the slot and leaves focus in place.
    pub fn handle_digit_input(&mut self, raw_input: &str, index: usize) {
        if !self.check_index(index) {
            return;
        }
        let value = raw_input.chars().last();
        if value.is_some_and(|c| !c.is_ascii_digit()) {
            return;
        }

        self.buffer.set(index, value);
        self.on_buffer_changed();

        if value.is_some() && index + 1 < self.len() {
            self.focus_slot(index + 1);
        }
    }

    /// Moves focus for the navigation keys; never changes slot contents.
    ///
    /// `current_value` is the slot's content before the key takes effect.
    pub fn handle_key_navigation(&mut self, key: NavKey, index: usize, current_value: &str) {
        if !self.check_index(index) {
            return;
        }
        match key {
            NavKey::Backspace if current_value.is_empty() && index > 0 => self.focus_slot(index - 1),
            NavKey::ArrowRight if index + 1 < self.len() => self.focus_slot(index + 1),
            NavKey::ArrowLeft if index > 0 => self.focus_slot(index - 1),
            _ => {}
        }
    }

    /// Distributes the digits found in `clipboard_text` across the slots.
    ///
    /// Non-digits are dropped, surplus digits are ignored, and slots past the
    /// last pasted digit are cleared. Focus lands after the last pasted digit,
    /// clamped to the final slot.
    pub fn handle_paste(&mut self, clipboard_text: &str) {
        let pasted = self.buffer.overwrite_from(clipboard_text);
        self.on_buffer_changed();
        self.focus_slot(pasted.min(self.len() - 1));
    }

    /// Delivers a due ticket from the scheduler.
    ///
    /// Returns `true` when the ticket belonged to the armed timer and the
    /// completion callback ran. Stale tickets are ignored.
    pub fn fire(&mut self, ticket: SubmitTicket) -> bool {
        let pending = match self.pending.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                self.pending = other;
                debug!(%ticket, "ignoring stale submit ticket");
                return false;
            }
        };

        debug!(%ticket, "auto-submit timer fired");
        match self.reset_order {
            ResetOrder::AfterCallback => {
                (self.on_complete)(&pending.code);
                self.buffer.clear();
            }
            ResetOrder::BeforeCallback => {
                self.buffer.clear();
                (self.on_complete)(&pending.code);
            }
        }
        true
    }

    pub fn state(&self) -> EntryState {
        if self.pending.is_some() { EntryState::Complete } else { EntryState::Incomplete }
    }

    /// Ticket of the armed timer, if any.
    pub fn pending_ticket(&self) -> Option<SubmitTicket> {
        self.pending.as_ref().map(|pending| pending.ticket)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    /// Display value of slot `index`: the digit, or `None` when empty.
    pub fn slot_value(&self, index: usize) -> Option<char> {
        self.buffer.get(index)
    }

    pub fn code(&self) -> String {
        self.buffer.joined()
    }

    pub fn slot_label(&self, index: usize) -> String {
        slot_label(index, self.len())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn check_index(&self, index: usize) -> bool {
        if index < self.len() {
            return true;
        }
        warn!(index, length = self.len(), "ignoring event for out-of-range slot");
        false
    }

    fn focus_slot(&self, index: usize) {
        for (slot, handle) in self.handles.iter().enumerate() {
            if let Some(handle) = handle {
                handle.set_focused(slot == index);
            }
        }
    }

    fn on_buffer_changed(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(&pending.timer);
            debug!(ticket = %pending.ticket, "buffer changed; cancelled pending submit");
        }
        if self.buffer.is_full() {
            self.arm();
        }
    }

    fn arm(&mut self) {
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        let timer = self.scheduler.schedule(self.auto_submit_delay, ticket);
        debug!(%ticket, delay_ms = self.auto_submit_delay.as_millis() as u64, "code complete; auto-submit armed");
        self.pending = Some(PendingSubmit {
            ticket,
            timer,
            code: self.buffer.joined(),
        });
    }
}

impl<S: Scheduler, H: SlotFocus> Drop for OtpEntryController<S, H> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(&pending.timer);
        }
    }
}
