//! Bot credentials and runtime settings.

use std::path::PathBuf;
use std::time::Duration;

use super::{
    DEFAULT_FONT_SIZE, DEFAULT_HTTP_TIMEOUT, DEFAULT_UPDATE_INTERVAL, FONT_CANDIDATES,
    TEMPLATE_FILE_NAME,
};
use crate::telegram::Destination;

/// Credentials and the fixed broadcast target.
#[derive(Clone)]
pub struct BotConfig {
    /// Bot API token (obtain from @BotFather).
    pub bot_token: String,

    /// Chat that receives the scheduled updates.
    pub broadcast: Destination,
}

impl BotConfig {
    /// Creates a new bot configuration.
    #[must_use]
    pub const fn new(bot_token: String, broadcast: Destination) -> Self {
        Self {
            bot_token,
            broadcast,
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `BOT_TOKEN` and `CHAT_ID` to be set and non-empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar(key))
        };

        let bot_token = required("BOT_TOKEN")?;
        let chat_id = required("CHAT_ID")?;
        let Ok(broadcast) = chat_id.parse::<Destination>();

        Ok(Self::new(bot_token, broadcast))
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &mask_token(&self.bot_token))
            .field("broadcast", &self.broadcast)
            .finish()
    }
}

/// Tunables with sensible defaults.
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Template image the prices are drawn on.
    pub template_path: PathBuf,

    /// Font files tried in order.
    pub font_candidates: Vec<PathBuf>,

    /// Overlay font size in points.
    pub font_size: f32,

    /// Interval between scheduled broadcasts.
    pub update_interval: Duration,

    /// Timeout for each price provider request.
    pub http_timeout: Duration,
}

fn default_template_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEMPLATE_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(TEMPLATE_FILE_NAME))
}

fn default_font_candidates() -> Vec<PathBuf> {
    FONT_CANDIDATES.iter().map(PathBuf::from).collect()
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            font_candidates: default_font_candidates(),
            font_size: DEFAULT_FONT_SIZE,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut font_candidates = default_font_candidates();
        if let Some(extra) = lookup("FONT_PATH").filter(|p| !p.is_empty()) {
            font_candidates.insert(0, PathBuf::from(extra));
        }

        Self {
            template_path: lookup("TEMPLATE_PATH")
                .filter(|p| !p.is_empty())
                .map_or_else(default_template_path, PathBuf::from),
            font_candidates,
            font_size: lookup("FONT_SIZE")
                .and_then(|s| s.parse::<f32>().ok())
                .filter(|size| *size > 0.0)
                .unwrap_or(DEFAULT_FONT_SIZE),
            update_interval: lookup("UPDATE_INTERVAL_MINUTES")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|mins| *mins > 0)
                .map_or(DEFAULT_UPDATE_INTERVAL, |mins| Duration::from_secs(mins * 60)),
            http_timeout: lookup("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map_or(DEFAULT_HTTP_TIMEOUT, Duration::from_secs),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
}

/// Masks a bot token for logging (keeps the numeric bot id).
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{bot_id}:***"),
        None => "***".to_owned(),
    }
}
