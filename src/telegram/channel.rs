//! Message delivery channel abstraction.
//!
//! The dispatcher only needs two operations from the outside world:
//! send a captioned photo and send a plain text message. Keeping them
//! behind a trait lets the scheduler and command paths run against an
//! in-memory channel in tests.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::render::RenderedImage;

/// Chat or channel a message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Numeric chat id (users, groups, channels by id).
    Chat(i64),
    /// Public channel username, always stored with the leading `@`.
    Channel(String),
}

impl FromStr for Destination {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self::Chat(id));
        }
        let name = s.trim_start_matches('@');
        Ok(Self::Channel(format!("@{name}")))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat(id) => write!(f, "{id}"),
            Self::Channel(name) => f.write_str(name),
        }
    }
}

/// Errors surfaced by a delivery channel.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The channel asked us to slow down.
    #[error("Rate limited by delivery channel (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// Transport-level failure or timeout; the next scheduled run retries.
    #[error("Delivery network error: {0}")]
    Network(String),

    /// The channel rejected the request.
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Outbound side of the chat bot.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Sends a rendered image with a caption.
    async fn send_photo(
        &self,
        to: &Destination,
        image: RenderedImage,
        caption: &str,
    ) -> Result<(), DeliveryError>;

    /// Sends a plain text message.
    async fn send_text(&self, to: &Destination, text: &str) -> Result<(), DeliveryError>;
}
