//! Price fetching module.
//!
//! Retrieves BTC and ETH prices from a primary provider with a
//! fallback provider and bounded retry-with-backoff per request.

mod fetcher;
mod http;
mod quote;

use thiserror::Error;

pub use fetcher::{BINANCE_BTC_URL, BINANCE_ETH_URL, COINGECKO_URL, PriceFetcher};
pub use http::{HttpReply, HttpTransport, ReqwestTransport, RetryPolicy, get_json};
pub use quote::{PriceQuote, PriceSource};

/// Errors that can occur while fetching prices.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response is missing {field}")]
    MissingField {
        provider: PriceSource,
        field: &'static str,
    },

    #[error("Fetch failed: {url} after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },
}
