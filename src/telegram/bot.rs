//! Telegram Bot API implementation of the delivery channel.

use async_trait::async_trait;
use teloxide::RequestError;
use teloxide::payloads::SendPhotoSetters;
use teloxide::prelude::*;
use teloxide::types::{InputFile, Recipient};
use tracing::{debug, warn};

use super::channel::{DeliveryChannel, DeliveryError, Destination};
use crate::config::PHOTO_FILE_NAME;
use crate::render::RenderedImage;

impl From<RequestError> for DeliveryError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::RetryAfter(seconds) => Self::RateLimited {
                retry_after: Some(seconds.duration()),
            },
            RequestError::Network(e) => Self::Network(e.to_string()),
            RequestError::Io(e) => Self::Network(e.to_string()),
            other => Self::Rejected(other.to_string()),
        }
    }
}

impl From<&Destination> for Recipient {
    fn from(destination: &Destination) -> Self {
        match destination {
            Destination::Chat(id) => Self::Id(ChatId(*id)),
            Destination::Channel(name) => Self::ChannelUsername(name.clone()),
        }
    }
}

/// Delivery channel backed by a Telegram bot token.
#[derive(Clone)]
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    /// Wraps an existing bot handle.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl DeliveryChannel for TelegramChannel {
    async fn send_photo(
        &self,
        to: &Destination,
        image: RenderedImage,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        debug!("Sending {} byte photo to {}", image.len(), to);

        let photo = InputFile::memory(image.into_bytes()).file_name(PHOTO_FILE_NAME);
        self.bot
            .send_photo(Recipient::from(to), photo)
            .caption(caption)
            .await
            .map(|_| ())
            .map_err(|e| {
                let err = DeliveryError::from(e);
                if let DeliveryError::RateLimited { retry_after } = &err {
                    warn!("Telegram rate limit hit, retry after {:?}", retry_after);
                }
                err
            })
    }

    async fn send_text(&self, to: &Destination, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(Recipient::from(to), text)
            .await
            .map(|_| ())
            .map_err(DeliveryError::from)
    }
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramChannel").finish_non_exhaustive()
    }
}
