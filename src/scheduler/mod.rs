//! Price update scheduler module.
//!
//! Broadcasts a price image once at startup and then on a fixed
//! interval, surviving any per-run failure.

mod runner;
mod state;

pub use runner::{PriceScheduler, SchedulerMessage};
pub use state::SchedulerState;
