//! Price quote returned by the fetcher.

use std::fmt;

/// Provider that answered a price request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// Primary provider, one combined request.
    CoinGecko,
    /// Fallback provider, one request per asset.
    Binance,
}

impl PriceSource {
    /// Human-readable label used in captions and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CoinGecko => "CoinGecko",
            Self::Binance => "Binance",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// BTC and ETH prices in USD from a single provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub btc: f64,
    pub eth: f64,
    pub source: PriceSource,
}

impl PriceQuote {
    #[must_use]
    pub const fn new(btc: f64, eth: f64, source: PriceSource) -> Self {
        Self { btc, eth, source }
    }
}
