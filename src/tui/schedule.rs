//! Per-panel refresh schedules for the event loop.

use std::time::{Duration, Instant};

/// Deadline used when `now + interval` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Tracks when a panel is next due for a refresh.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    next_due: Instant,
}

impl RefreshSchedule {
    /// A schedule that is due immediately.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval; the next refresh moves relative to `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.next_due = self.next_due.min(deadline(now, interval));
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Record a refresh at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.next_due = deadline(now, self.interval);
    }

    /// Make the schedule due immediately.
    pub fn force(&mut self, now: Instant) {
        self.next_due = now;
    }

    pub fn time_until(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

fn deadline(now: Instant, interval: Duration) -> Instant {
    now.checked_add(interval)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Convert a configured interval in seconds, treating non-positive,
/// non-finite or unrepresentable values as one second.
pub fn interval_from_secs(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(interval) if !interval.is_zero() => interval,
        _ => Duration::from_secs(1),
    }
}
