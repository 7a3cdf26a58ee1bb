use serde::Serialize;
use std::fmt;

/// Identifies one armed timer. Tokens are never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// A timer that came due, handed back to its owner to run.
#[derive(Debug, Clone, PartialEq)]
pub struct Expired<T> {
    pub token: TimerToken,
    pub due_at_ms: u64,
    pub task: T,
}

/// Cancellable delayed execution of automatic transitions.
///
/// A scheduler holds at most one pending timer. Arming a new timer cancels the previous
/// one, and a cancelled timer is never returned from `pop_due`.
pub trait Scheduler<T> {
    /// The scheduler's current time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Arms a timer `delay_ms` from now, replacing any pending timer.
    fn schedule(&mut self, delay_ms: u64, task: T) -> TimerToken;

    /// Cancels the timer if it is still pending. Returns whether anything was cancelled.
    fn cancel(&mut self, token: TimerToken) -> bool;

    /// The currently pending timer, if any.
    fn pending(&self) -> Option<TimerToken>;

    /// Milliseconds until the pending timer is due, if any.
    fn next_due_in(&self) -> Option<u64>;

    /// Removes and returns the pending timer if it is due at or before `deadline_ms`,
    /// moving the clock to its due time.
    fn pop_due(&mut self, deadline_ms: u64) -> Option<Expired<T>>;

    /// Moves the clock forward to `deadline_ms` without firing anything.
    fn advance_to(&mut self, deadline_ms: u64);
}

struct Timer<T> {
    token: TimerToken,
    due_at_ms: u64,
    task: T,
}

/// A deterministic scheduler driven by explicit time steps.
///
/// Nothing fires on its own: the owner moves time forward and collects what came due.
/// A zero delay is due on the next step, never during `schedule` itself.
pub struct VirtualScheduler<T> {
    now_ms: u64,
    next_token: u64,
    pending: Option<Timer<T>>,
}

impl<T> VirtualScheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_token: 0,
            pending: None,
        }
    }
}

impl<T> Default for VirtualScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> for VirtualScheduler<T> {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule(&mut self, delay_ms: u64, task: T) -> TimerToken {
        if let Some(previous) = self.pending.take() {
            tracing::debug!("Replacing pending {}", previous.token);
        }
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending = Some(Timer {
            token,
            due_at_ms: self.now_ms.saturating_add(delay_ms),
            task,
        });
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        match &self.pending {
            Some(timer) if timer.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    fn pending(&self) -> Option<TimerToken> {
        self.pending.as_ref().map(|timer| timer.token)
    }

    fn next_due_in(&self) -> Option<u64> {
        self.pending
            .as_ref()
            .map(|timer| timer.due_at_ms.saturating_sub(self.now_ms))
    }

    fn pop_due(&mut self, deadline_ms: u64) -> Option<Expired<T>> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|timer| timer.due_at_ms <= deadline_ms);
        if !due {
            return None;
        }
        let timer = self.pending.take()?;
        self.now_ms = self.now_ms.max(timer.due_at_ms);
        Some(Expired {
            token: timer.token,
            due_at_ms: timer.due_at_ms,
            task: timer.task,
        })
    }

    fn advance_to(&mut self, deadline_ms: u64) {
        self.now_ms = self.now_ms.max(deadline_ms);
    }
}
