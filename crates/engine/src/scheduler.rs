//! Cancellable one-shot timers used for auto-submit.
//!
//! A [`Scheduler`] never runs controller code itself. It hands the
//! [`SubmitTicket`] back to whoever owns the controller once the delay has
//! elapsed, and the owner calls `OtpEntryController::fire` on its own thread.
//! That keeps every buffer mutation on the host's event loop.

use std::time::Duration;

use otp_entry_types::SubmitTicket;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::debug;

/// Arms and cancels deferred ticket deliveries.
pub trait Scheduler {
    /// Opaque handle for one armed timer.
    type Handle;

    /// Arranges for `ticket` to be delivered after `delay`. Must not block.
    fn schedule(&mut self, delay: Duration, ticket: SubmitTicket) -> Self::Handle;

    /// Cancels the timer behind `handle`. Cancelling a timer that already
    /// fired or was already cancelled does nothing.
    fn cancel(&mut self, handle: &Self::Handle);
}

/// Scheduler backed by Tokio timers.
///
/// Each arming spawns a task that sleeps and then sends the ticket over an
/// unbounded channel; the receiving half belongs to the host's event loop.
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    sender: UnboundedSender<SubmitTicket>,
}

/// Handle to a spawned Tokio timer task.
#[derive(Debug)]
pub struct TokioTimer {
    task: JoinHandle<()>,
}

impl TokioScheduler {
    /// Creates a scheduler together with the receiver that yields due tickets.
    pub fn new() -> (Self, UnboundedReceiver<SubmitTicket>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn with_sender(sender: UnboundedSender<SubmitTicket>) -> Self {
        Self { sender }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimer;

    fn schedule(&mut self, delay: Duration, ticket: SubmitTicket) -> TokioTimer {
        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(ticket).is_err() {
                debug!(%ticket, "submit receiver dropped before timer fired");
            }
        });
        TokioTimer { task }
    }

    fn cancel(&mut self, handle: &TokioTimer) {
        // aborting a finished task is a no-op
        handle.task.abort();
    }
}

/// Scheduler driven by a virtual clock.
///
/// Nothing happens until [`ManualScheduler::advance`] is called, which makes
/// it suitable for deterministic hosts and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_timer_id: u64,
    entries: Vec<ManualEntry>,
}

#[derive(Debug)]
struct ManualEntry {
    timer_id: u64,
    deadline: Duration,
    ticket: SubmitTicket,
}

/// Handle to a timer armed on a [`ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualTimer(u64);

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed, not yet delivered timers.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Moves the virtual clock forward and returns the tickets that came due,
    /// earliest deadline first.
    pub fn advance(&mut self, by: Duration) -> Vec<SubmitTicket> {
        self.now = self.now.saturating_add(by);
        let now = self.now;
        let mut due: Vec<ManualEntry> = self.entries.extract_if(.., |entry| entry.deadline <= now).collect();
        due.sort_by_key(|entry| (entry.deadline, entry.timer_id));
        due.into_iter().map(|entry| entry.ticket).collect()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn schedule(&mut self, delay: Duration, ticket: SubmitTicket) -> ManualTimer {
        let timer_id = self.next_timer_id;
        self.next_timer_id += 1;
        self.entries.push(ManualEntry {
            timer_id,
            deadline: self.now.saturating_add(delay),
            ticket,
        });
        ManualTimer(timer_id)
    }

    fn cancel(&mut self, handle: &ManualTimer) {
        self.entries.retain(|entry| entry.timer_id != handle.0);
    }
}
