//! HTTP access for price providers, with retry and backoff.
//!
//! Each GET is attempted up to [`RetryPolicy::max_attempts`] times:
//! - HTTP 429 sleeps for the `Retry-After` header (or the policy default)
//!   and retries without exponential growth
//! - any other failure sleeps `2^attempt` seconds before the next try
//! - no sleep follows the final attempt, so an endpoint failing three
//!   times in a row gives up after 1 + 2 = 3 seconds of backoff rather
//!   than also waiting out a third pause

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::FetchError;
use crate::config::HTTP_USER_AGENT;

/// Raw response as seen by the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    /// Value of the `Retry-After` header, if present.
    pub retry_after: Option<String>,
    pub body: String,
}

impl HttpReply {
    /// Creates a reply without a `Retry-After` header.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parses `Retry-After` as whole seconds.
    fn retry_after_secs(&self) -> Option<u64> {
        self.retry_after.as_deref()?.trim().parse().ok()
    }
}

/// Minimal GET-only transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpReply, FetchError>;
}

/// Transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client with the bot's user agent and request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(HttpReply {
            status,
            retry_after,
            body,
        })
    }
}

/// Retry settings for a single URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Wait used for 429 responses without a usable `Retry-After`.
    pub default_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            default_retry_after: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Backoff after a failed (non-429) attempt, 0-based.
    #[must_use]
    pub const fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(1 << attempt)
    }
}

/// GETs `url` and decodes the JSON body, retrying per `policy`.
pub async fn get_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    policy: &RetryPolicy,
    url: &str,
) -> Result<T, FetchError> {
    for attempt in 0..policy.max_attempts {
        let failure = match transport.get(url).await {
            Ok(reply) if reply.status == 429 => {
                let wait = reply
                    .retry_after_secs()
                    .map_or(policy.default_retry_after, Duration::from_secs);
                warn!("Rate limited ({}). Sleeping {}s...", url, wait.as_secs());
                tokio::time::sleep(wait).await;
                continue;
            }
            Ok(reply) if !reply.is_success() => FetchError::Status {
                url: url.to_owned(),
                status: reply.status,
            },
            Ok(reply) => match serde_json::from_str::<T>(&reply.body) {
                Ok(value) => {
                    debug!("GET {} succeeded on attempt {}", url, attempt + 1);
                    return Ok(value);
                }
                Err(source) => FetchError::Malformed {
                    url: url.to_owned(),
                    source,
                },
            },
            Err(e) => e,
        };

        if attempt + 1 < policy.max_attempts {
            let wait = policy.backoff(attempt);
            warn!("HTTP error on {}: {} (retry in {}s)", url, failure, wait.as_secs());
            tokio::time::sleep(wait).await;
        } else {
            warn!("HTTP error on {}: {} (giving up)", url, failure);
        }
    }

    Err(FetchError::Exhausted {
        url: url.to_owned(),
        attempts: policy.max_attempts,
    })
}
