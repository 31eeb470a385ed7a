//! Debounced auto-save primitive.
//!
//! A burst of edits collapses into one pending write: each `submit` replaces
//! the held value and restarts the window, `poll` hands the value out once
//! the window has elapsed, `flush` hands it out immediately (editor close).
//! The last submitted edit is never dropped.
//!
//! Single-threaded and cooperative; the caller drives time by passing
//! `Instant`s, so there are no timers or background threads to leak.

use std::time::{Duration, Instant};

/// Default quiet window before an edit burst is persisted.
pub const DEFAULT_AUTOSAVE_WINDOW: Duration = Duration::from_millis(1000);

/// Coalescing pending-write cell for one record.
#[derive(Debug)]
pub struct DebouncedSave<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> DebouncedSave<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replaces the pending value and restarts the quiet window.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.window,
        });
    }

    /// Yields the pending value once the window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending.take().map(|pending| pending.value)
            }
            _ => None,
        }
    }

    /// Yields the pending value immediately, window or not.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for DebouncedSave<T> {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_WINDOW)
    }
}
