// Chunk: docs/chunks/refresh_scheduling - Per-line relabel throttling
//!
//! Throttling of full relabels.
//!
//! A line is fully relabeled at most once per minimum interval. A request
//! that arrives earlier is not dropped: it schedules a single deferred
//! re-check at the end of the interval, and further early requests coalesce
//! into that one. Forced requests and a line's first labeling always run.
//!
//! This is a pure data structure with no clock of its own. Callers pass the
//! current `Instant`, which keeps the behavior deterministic under test.

use std::time::{Duration, Instant};

/// Default minimum interval between full relabels of a line.
pub const DEFAULT_MIN_REFRESH_INTERVAL_MS: u64 = 500;

/// What to do with a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Relabel at the next opportunity.
    Run,
    /// Too early; a re-check is scheduled for the given instant.
    Deferred(Instant),
    /// Too early, and a re-check was already scheduled.
    Coalesced,
}

/// Throttle state of one line.
#[derive(Debug, Clone, Default)]
pub struct RefreshThrottle {
    last_run: Option<Instant>,
    deferred_until: Option<Instant>,
}

impl RefreshThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides what to do with a refresh request made at `now`.
    ///
    /// # Arguments
    ///
    /// * `now` - The current timestamp (passed in for testability)
    /// * `interval` - The minimum interval between relabels
    /// * `force` - Bypass the interval
    pub fn request(&mut self, now: Instant, interval: Duration, force: bool) -> ThrottleDecision {
        let last_run = match self.last_run {
            Some(last_run) => last_run,
            None => return ThrottleDecision::Run,
        };
        if force || now.saturating_duration_since(last_run) >= interval {
            return ThrottleDecision::Run;
        }
        if self.deferred_until.is_some() {
            return ThrottleDecision::Coalesced;
        }
        let due = last_run + interval;
        self.deferred_until = Some(due);
        ThrottleDecision::Deferred(due)
    }

    /// Records that the line was relabeled at `now`.
    ///
    /// Clears any scheduled re-check, since the relabel covers it.
    pub fn mark_ran(&mut self, now: Instant) {
        self.last_run = Some(now);
        self.deferred_until = None;
    }

    /// Consumes the scheduled re-check if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deferred_until {
            Some(due) if now >= due => {
                self.deferred_until = None;
                true
            }
            _ => false,
        }
    }

    /// Returns true if a re-check is scheduled.
    pub fn is_deferred(&self) -> bool {
        self.deferred_until.is_some()
    }

    /// Returns true once the line has been labeled.
    pub fn has_run(&self) -> bool {
        self.last_run.is_some()
    }

    pub fn last_run(&self) -> Option<Instant> {
        self.last_run
    }
}
