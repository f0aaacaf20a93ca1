//! Quiet-period debounce for editor autosave.
//!
//! # Design
//!
//! Instead of committing on every keystroke, edits arm a deadline one
//! quiet period in the future; a further edit re-arms it. The event loop
//! polls [`Debouncer::fire_due`] with the current time and commits when
//! the deadline has elapsed. The caller owns time, so there is no timer
//! thread and tests are deterministic.

use std::time::{Duration, Instant};

/// Quiet period before buffered edits are committed to the store.
pub const AUTOSAVE_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Single pending-deadline debounce.
///
/// At most one deadline is armed at a time; re-arming replaces it, so the
/// eventual fire always reflects the latest edit.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Arms (or re-arms) the deadline one quiet period after `now`.
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Drops any pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns whether a deadline is currently armed.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns whether the armed deadline has elapsed at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Fires the deadline if due: returns `true` at most once per arming.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(AUTOSAVE_QUIET_PERIOD)
    }
}
