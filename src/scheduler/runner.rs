//! Scheduled price broadcaster.
//!
//! The scheduler has a single running state:
//! 1. Dispatch once immediately on start
//! 2. Every check tick, dispatch if the update interval has elapsed
//!    since the last dispatch started
//! 3. A dispatch that panics is logged, followed by a short recovery
//!    pause; the loop keeps going
//!
//! Each dispatch runs as its own task so a panic inside it cannot take
//! the loop down with it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use super::SchedulerState;
use crate::config::{DEFAULT_UPDATE_INTERVAL, SCHEDULER_CHECK_INTERVAL, SCHEDULER_RECOVERY_DELAY};
use crate::dispatch::UpdateDispatcher;

/// Messages that can be sent to the scheduler.
#[derive(Debug, Clone)]
pub enum SchedulerMessage {
    /// Stop the scheduler.
    Shutdown,
}

/// Periodic broadcaster of price images.
pub struct PriceScheduler {
    /// Shared fetch → render → deliver logic.
    dispatcher: Arc<UpdateDispatcher>,

    /// Dispatch bookkeeping.
    state: SchedulerState,

    /// Interval between broadcasts.
    update_interval: Duration,

    /// Granularity of the due check.
    check_interval: Duration,

    /// Pause after a panicked dispatch.
    recovery_delay: Duration,
}

impl PriceScheduler {
    /// Creates a scheduler with the default 30-minute interval.
    #[must_use]
    pub fn new(dispatcher: Arc<UpdateDispatcher>) -> Self {
        Self {
            dispatcher,
            state: SchedulerState::new(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
            check_interval: SCHEDULER_CHECK_INTERVAL,
            recovery_delay: SCHEDULER_RECOVERY_DELAY,
        }
    }

    /// Sets the interval between broadcasts.
    #[must_use]
    pub const fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Runs the scheduler loop until a shutdown message arrives.
    ///
    /// Returns the final bookkeeping so the caller can report it.
    pub async fn run(mut self, mut rx: mpsc::Receiver<SchedulerMessage>) -> SchedulerState {
        info!("Sending initial update...");
        self.dispatch().await;
        info!(
            "Scheduler started (every {} minutes).",
            self.update_interval.as_secs() / 60
        );

        let mut check_timer = interval(self.check_interval);
        check_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = check_timer.tick() => {
                    if self.state.is_due(self.update_interval) {
                        self.dispatch().await;
                    }
                }
                msg = rx.recv() => {
                    match msg {
                        Some(SchedulerMessage::Shutdown) | None => {
                            info!("Scheduler shutting down");
                            break;
                        }
                    }
                }
            }
        }

        self.state
    }

    /// Runs one scheduled dispatch in its own task.
    async fn dispatch(&mut self) {
        self.state.mark_dispatched();
        debug!("Scheduled dispatch #{}", self.state.dispatch_count);

        let dispatcher = Arc::clone(&self.dispatcher);
        let task = tokio::spawn(async move { dispatcher.dispatch_scheduled().await });

        if let Err(e) = task.await {
            self.state.mark_failed();
            error!("Scheduler loop error: {}", e);
            tokio::time::sleep(self.recovery_delay).await;
        }
    }
}

impl std::fmt::Debug for PriceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceScheduler")
            .field("update_interval", &self.update_interval)
            .field("check_interval", &self.check_interval)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
