//! Fetch → render → deliver cycle.
//!
//! Failure containment depends on who asked:
//! - scheduled runs log and return, never propagating an error
//! - on-demand runs log, send a text notice to the requester, and report
//!   the failure to the caller
//!
//! A delivery rate limit sleeps for the channel's delay before returning;
//! network problems are only logged and left to the next run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::DEFAULT_DELIVERY_RETRY_AFTER;
use crate::prices::{FetchError, PriceFetcher, PriceSource};
use crate::render::{ImageRenderer, RenderError};
use crate::telegram::{DeliveryChannel, DeliveryError, Destination};

/// Text sent to a requester when an on-demand update fails.
pub const ERROR_NOTICE: &str = "Sorry, I hit an error fetching prices 🙈";

/// Errors that can abort a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Render task failed: {0}")]
    RenderTask(String),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Who triggered a dispatch; selects the caption wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Scheduled,
    OnDemand,
}

/// Builds the photo caption.
#[must_use]
pub fn caption(kind: DispatchKind, source: PriceSource, at: DateTime<Utc>) -> String {
    let timestamp = at.format("%Y-%m-%d %H:%M UTC");
    match kind {
        DispatchKind::Scheduled => format!("BTC/ETH update • {source} • {timestamp}"),
        DispatchKind::OnDemand => format!("BTC/ETH • {source} • {timestamp}"),
    }
}

/// Combines fetcher, renderer and delivery channel.
pub struct UpdateDispatcher {
    fetcher: PriceFetcher,
    renderer: Arc<ImageRenderer>,
    channel: Arc<dyn DeliveryChannel>,
    broadcast: Destination,
}

impl UpdateDispatcher {
    #[must_use]
    pub fn new(
        fetcher: PriceFetcher,
        renderer: ImageRenderer,
        channel: Arc<dyn DeliveryChannel>,
        broadcast: Destination,
    ) -> Self {
        Self {
            fetcher,
            renderer: Arc::new(renderer),
            channel,
            broadcast,
        }
    }

    /// Sends an update to the broadcast destination, containing every failure.
    pub async fn dispatch_scheduled(&self) {
        if let Err(e) = self.deliver(&self.broadcast, DispatchKind::Scheduled).await {
            self.contain(&e, "send_update").await;
        }
    }

    /// Sends an update to `requester`.
    ///
    /// On failure the requester gets a text notice instead of the image
    /// and the error is returned for the caller's bookkeeping.
    pub async fn dispatch_on_demand(&self, requester: &Destination) -> Result<(), DispatchError> {
        match self.deliver(requester, DispatchKind::OnDemand).await {
            Ok(()) => {
                info!("/price served to chat {}", requester);
                Ok(())
            }
            Err(e) => {
                self.contain(&e, "/price").await;
                if let Err(notice_err) = self.channel.send_text(requester, ERROR_NOTICE).await {
                    warn!("Failed to notify {} about the error: {}", requester, notice_err);
                }
                Err(e)
            }
        }
    }

    async fn deliver(&self, to: &Destination, kind: DispatchKind) -> Result<(), DispatchError> {
        let quote = self.fetcher.fetch_prices().await?;

        let renderer = Arc::clone(&self.renderer);
        let image = tokio::task::spawn_blocking(move || renderer.render(quote.btc, quote.eth))
            .await
            .map_err(|e| DispatchError::RenderTask(e.to_string()))??;

        let caption = caption(kind, quote.source, Utc::now());
        self.channel.send_photo(to, image, &caption).await?;

        info!(
            "Sent update: BTC={} ETH={} via {} to {}",
            quote.btc, quote.eth, quote.source, to
        );
        Ok(())
    }

    async fn contain(&self, err: &DispatchError, context: &str) {
        match err {
            DispatchError::Delivery(DeliveryError::RateLimited { retry_after }) => {
                let wait = retry_after.unwrap_or(DEFAULT_DELIVERY_RETRY_AFTER);
                warn!("Telegram rate limit. Waiting {}s...", wait.as_secs());
                tokio::time::sleep(wait).await;
            }
            DispatchError::Delivery(DeliveryError::Network(e)) => {
                warn!("Telegram network issue: {} (retry next run)", e);
            }
            other => error!("{} failed: {}", context, other),
        }
    }
}

impl std::fmt::Debug for UpdateDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateDispatcher")
            .field("fetcher", &self.fetcher)
            .field("renderer", &self.renderer)
            .field("broadcast", &self.broadcast)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use chrono::TimeZone;
    use tokio::time::Instant;

    use super::*;
    use crate::prices::HttpTransport;
    use crate::render::OverlayFont;
    use crate::test_support::{
        Delivered, RecordingChannel, ScriptedTransport, binance_ok, coingecko_down, coingecko_ok,
        write_template,
    };

    const BROADCAST: Destination = Destination::Chat(-100);

    struct Harness {
        dispatcher: UpdateDispatcher,
        transport: Arc<ScriptedTransport>,
        channel: Arc<RecordingChannel>,
        template: PathBuf,
    }

    impl Drop for Harness {
        fn drop(&mut self) {
            std::fs::remove_file(&self.template).ok();
        }
    }

    fn harness(name: &str) -> Harness {
        let template = write_template(name, 480, 320);
        harness_with_template(template)
    }

    fn harness_with_template(template: PathBuf) -> Harness {
        let transport = Arc::new(ScriptedTransport::new());
        let (channel, _events) = RecordingChannel::new();
        let channel = Arc::new(channel);
        let dispatcher = UpdateDispatcher::new(
            PriceFetcher::new(Arc::clone(&transport) as Arc<dyn HttpTransport>),
            ImageRenderer::new(template.clone(), OverlayFont::bitmap()),
            Arc::clone(&channel) as Arc<dyn DeliveryChannel>,
            BROADCAST,
        );
        Harness {
            dispatcher,
            transport,
            channel,
            template,
        }
    }

    #[test]
    fn test_caption_format() {
        let at = Utc.with_ymd_and_hms(2023, 9, 14, 8, 5, 59).unwrap();
        assert_eq!(
            caption(DispatchKind::Scheduled, PriceSource::CoinGecko, at),
            "BTC/ETH update • CoinGecko • 2023-09-14 08:05 UTC"
        );
        assert_eq!(
            caption(DispatchKind::OnDemand, PriceSource::Binance, at),
            "BTC/ETH • Binance • 2023-09-14 08:05 UTC"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_uses_primary_label() {
        let h = harness("dispatch-primary");
        coingecko_ok(&h.transport, 27_543.2, 1_823.91);

        h.dispatcher.dispatch_scheduled().await;

        let attempts = h.channel.attempts();
        assert_eq!(attempts.len(), 1);
        let Delivered::Photo { to, caption, bytes } = &attempts[0] else {
            panic!("expected a photo, got {attempts:?}");
        };
        assert_eq!(to, &BROADCAST);
        assert!(caption.starts_with("BTC/ETH update • CoinGecko • "));
        assert!(caption.ends_with(" UTC"));
        assert!(*bytes > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_uses_fallback_label() {
        let h = harness("dispatch-fallback");
        coingecko_down(&h.transport);
        binance_ok(&h.transport, 27_543.2, 1_823.91);

        h.dispatcher.dispatch_scheduled().await;

        let attempts = h.channel.attempts();
        assert!(matches!(
            &attempts[..],
            [Delivered::Photo { caption, .. }] if caption.contains("• Binance •")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_template_is_contained() {
        let h = harness_with_template(PathBuf::from("/nonexistent/frog.png"));
        coingecko_ok(&h.transport, 1.0, 2.0);

        h.dispatcher.dispatch_scheduled().await;

        assert!(h.channel.attempts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_rate_limit_sleeps_retry_after() {
        let h = harness("dispatch-rate-limit");
        coingecko_ok(&h.transport, 1.0, 2.0);
        h.channel.fail_next_photo(DeliveryError::RateLimited {
            retry_after: Some(Duration::from_secs(7)),
        });

        let start = Instant::now();
        h.dispatcher.dispatch_scheduled().await;
        assert_eq!(start.elapsed(), Duration::from_secs(7));
        assert_eq!(h.channel.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_rate_limit_default_wait() {
        let h = harness("dispatch-rate-limit-default");
        coingecko_ok(&h.transport, 1.0, 2.0);
        h.channel.fail_next_photo(DeliveryError::RateLimited { retry_after: None });

        let start = Instant::now();
        h.dispatcher.dispatch_scheduled().await;
        assert_eq!(start.elapsed(), DEFAULT_DELIVERY_RETRY_AFTER);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_network_error_is_deferred() {
        let h = harness("dispatch-network");
        coingecko_ok(&h.transport, 1.0, 2.0);
        h.channel.fail_next_photo(DeliveryError::Network("timed out".to_owned()));

        let start = Instant::now();
        h.dispatcher.dispatch_scheduled().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(h.channel.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_demand_success_goes_to_requester() {
        let h = harness("dispatch-on-demand");
        coingecko_ok(&h.transport, 64_000.0, 3_100.0);
        let requester = Destination::Chat(555);

        h.dispatcher.dispatch_on_demand(&requester).await.unwrap();

        let attempts = h.channel.attempts();
        assert!(matches!(
            &attempts[..],
            [Delivered::Photo { to, caption, .. }]
                if *to == requester && caption.starts_with("BTC/ETH • CoinGecko • ")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_demand_failure_sends_notice() {
        let h = harness("dispatch-on-demand-failure");
        let requester = Destination::Chat(555);

        let err = h.dispatcher.dispatch_on_demand(&requester).await.unwrap_err();
        assert!(matches!(err, DispatchError::Fetch(_)));

        assert_eq!(
            h.channel.attempts(),
            vec![Delivered::Text {
                to: requester,
                text: ERROR_NOTICE.to_owned(),
            }]
        );
    }
}
