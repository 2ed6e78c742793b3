//! Scheduler bookkeeping.

use std::time::Duration;

use tokio::time::Instant;

/// Tracks when the last scheduled dispatch started.
#[derive(Debug, Default)]
pub struct SchedulerState {
    /// Start of the most recent dispatch.
    last_dispatch: Option<Instant>,

    /// Dispatches started since launch.
    pub dispatch_count: u64,

    /// Dispatches that ended in a panic.
    pub failed_count: u64,
}

impl SchedulerState {
    /// Creates a new scheduler state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `interval` has elapsed since the last dispatch.
    ///
    /// Always true before the first dispatch.
    #[must_use]
    pub fn is_due(&self, interval: Duration) -> bool {
        self.last_dispatch
            .is_none_or(|started| started.elapsed() >= interval)
    }

    /// Records the start of a dispatch.
    pub fn mark_dispatched(&mut self) {
        self.last_dispatch = Some(Instant::now());
        self.dispatch_count += 1;
    }

    /// Records a dispatch that did not complete normally.
    pub fn mark_failed(&mut self) {
        self.failed_count += 1;
    }
}
