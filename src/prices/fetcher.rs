//! BTC/ETH price fetcher with provider fallback.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use super::http::{HttpTransport, RetryPolicy, get_json};
use super::{FetchError, PriceQuote, PriceSource};

/// Primary provider: both assets in one call.
pub const COINGECKO_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin,ethereum&vs_currencies=usd";

/// Fallback provider, BTC ticker.
pub const BINANCE_BTC_URL: &str = "https://api.binance.com/api/v3/ticker/price?symbol=BTCUSDT";

/// Fallback provider, ETH ticker.
pub const BINANCE_ETH_URL: &str = "https://api.binance.com/api/v3/ticker/price?symbol=ETHUSDT";

/// `{"bitcoin": {"usd": 1.0}, ...}`
type SimplePrice = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Deserialize)]
struct TickerPrice {
    #[serde(deserialize_with = "deserialize_string_to_f64")]
    price: f64,
}

fn deserialize_string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

/// Fetches current prices, CoinGecko first and Binance as fallback.
#[derive(Clone)]
pub struct PriceFetcher {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl PriceFetcher {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    /// Fetches both prices.
    ///
    /// The fallback is only consulted once the primary path has failed
    /// completely; its error is the one returned if it fails too.
    pub async fn fetch_prices(&self) -> Result<PriceQuote, FetchError> {
        match self.fetch_coingecko().await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                warn!("CoinGecko failed: {}. Falling back to Binance...", e);
                let quote = self.fetch_binance().await?;
                info!("Prices served by fallback provider {}", quote.source);
                Ok(quote)
            }
        }
    }

    async fn fetch_coingecko(&self) -> Result<PriceQuote, FetchError> {
        let body: SimplePrice = get_json(self.transport.as_ref(), &self.policy, COINGECKO_URL).await?;

        let usd = |asset: &'static str| {
            body.get(asset)
                .and_then(|quotes| quotes.get("usd"))
                .copied()
                .ok_or(FetchError::MissingField {
                    provider: PriceSource::CoinGecko,
                    field: asset,
                })
        };

        Ok(PriceQuote::new(usd("bitcoin")?, usd("ethereum")?, PriceSource::CoinGecko))
    }

    async fn fetch_binance(&self) -> Result<PriceQuote, FetchError> {
        let btc: TickerPrice = get_json(self.transport.as_ref(), &self.policy, BINANCE_BTC_URL).await?;
        let eth: TickerPrice = get_json(self.transport.as_ref(), &self.policy, BINANCE_ETH_URL).await?;
        Ok(PriceQuote::new(btc.price, eth.price, PriceSource::Binance))
    }
}

impl std::fmt::Debug for PriceFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceFetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
