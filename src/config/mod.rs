//! Configuration module for the price bot.
//!
//! Handles loading of the bot credentials, the broadcast destination,
//! and the tunables for fetching, rendering and scheduling.

mod settings;

use std::time::Duration;

pub use settings::{BotConfig, BotSettings, ConfigError};

/// How often a scheduled update is broadcast.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// How often the scheduler checks whether an update is due.
pub const SCHEDULER_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Pause after an unexpected scheduler error before resuming.
pub const SCHEDULER_RECOVERY_DELAY: Duration = Duration::from_secs(3);

/// Per-request timeout for price provider calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent to price providers.
pub const HTTP_USER_AGENT: &str = "frog-bot/1.0";

/// Wait used when a delivery rate limit carries no delay.
pub const DEFAULT_DELIVERY_RETRY_AFTER: Duration = Duration::from_secs(5);

/// Point size of the overlay font.
pub const DEFAULT_FONT_SIZE: f32 = 70.0;

/// File name of the template image, resolved next to the executable.
pub const TEMPLATE_FILE_NAME: &str = "frog.png";

/// File name attached to outgoing photos.
pub const PHOTO_FILE_NAME: &str = "frog.png";

/// Font files tried in order before falling back to the bitmap font.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
];
