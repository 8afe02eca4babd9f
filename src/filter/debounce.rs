//! Debounced search input.
//!
//! A pending search is a scheduled task with a due time. Scheduling again
//! supersedes (drops) the pending task. Time is passed in by the caller so the
//! state machine stays pure and testable without sleeping.

use std::time::{Duration, Instant};
use tracing::trace;

/// Default delay between the last keystroke and recomputation.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingSearch {
    text: String,
    due: Instant,
}

/// Cancellable scheduled search-text update.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<PendingSearch>,
}

impl SearchDebouncer {
    /// Debouncer waiting `delay` after the last keystroke.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `text` to fire at `now + delay`, cancelling any pending task.
    pub fn schedule(&mut self, text: impl Into<String>, now: Instant) {
        if let Some(dropped) = self.pending.take() {
            trace!(dropped = %dropped.text, "Superseded pending search");
        }
        self.pending = Some(PendingSearch {
            text: text.into(),
            due: now + self.delay,
        });
    }

    /// Fire the pending task if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if now >= pending.due => self.pending.take().map(|p| p.text),
            _ => None,
        }
    }

    /// Take the pending text regardless of due time.
    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.text)
    }

    /// Drop the pending task. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether a search is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending task fires, for an event loop's poll timeout.
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS))
    }
}
