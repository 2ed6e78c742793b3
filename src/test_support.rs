//! Fakes shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::FONT_CANDIDATES;
use crate::prices::{FetchError, HttpReply, HttpTransport};
use crate::render::{OverlayFont, RenderedImage};
use crate::telegram::{DeliveryChannel, DeliveryError, Destination};

/// Transport that replays scripted replies per URL fragment.
///
/// A request matches the first registered fragment contained in its URL.
/// Unscripted requests fail with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<(String, VecDeque<Result<HttpReply, FetchError>>)>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, fragment: &str, reply: Result<HttpReply, FetchError>) {
        let mut routes = self.routes.lock().unwrap();
        if let Some((_, queue)) = routes.iter_mut().find(|(f, _)| f == fragment) {
            queue.push_back(reply);
        } else {
            routes.push((fragment.to_owned(), VecDeque::from([reply])));
        }
    }

    pub fn hits(&self, fragment: &str) -> usize {
        self.hits.lock().unwrap().get(fragment).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, FetchError> {
        let mut routes = self.routes.lock().unwrap();
        let Some((fragment, queue)) = routes.iter_mut().find(|(f, _)| url.contains(f.as_str())) else {
            return Err(FetchError::Transport(format!("no route for {url}")));
        };
        *self.hits.lock().unwrap().entry(fragment.clone()).or_default() += 1;
        queue
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("script exhausted for {url}"))))
    }
}

/// Scripts a successful CoinGecko reply.
pub fn coingecko_ok(transport: &ScriptedTransport, btc: f64, eth: f64) {
    let body = format!(r#"{{"bitcoin":{{"usd":{btc}}},"ethereum":{{"usd":{eth}}}}}"#);
    transport.push("coingecko", Ok(HttpReply::new(200, body)));
}

/// Scripts a failing CoinGecko endpoint.
pub fn coingecko_down(transport: &ScriptedTransport) {
    for _ in 0..3 {
        transport.push("coingecko", Ok(HttpReply::new(500, "internal error")));
    }
}

/// Scripts successful Binance replies for both tickers.
pub fn binance_ok(transport: &ScriptedTransport, btc: f64, eth: f64) {
    transport.push(
        "BTCUSDT",
        Ok(HttpReply::new(200, format!(r#"{{"symbol":"BTCUSDT","price":"{btc:.8}"}}"#))),
    );
    transport.push(
        "ETHUSDT",
        Ok(HttpReply::new(200, format!(r#"{{"symbol":"ETHUSDT","price":"{eth:.8}"}}"#))),
    );
}

/// Something the fake channel was asked to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Photo {
        to: Destination,
        caption: String,
        bytes: usize,
    },
    Text {
        to: Destination,
        text: String,
    },
}

/// A delivery attempt and the paused-clock time it happened at.
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub at: Instant,
    pub delivered: Delivered,
}

/// Channel that records every send and can fail photo sends on demand.
pub struct RecordingChannel {
    attempts: Mutex<Vec<Delivered>>,
    photo_failures: Mutex<VecDeque<DeliveryError>>,
    events: mpsc::UnboundedSender<DeliveryAttempt>,
}

impl RecordingChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DeliveryAttempt>) {
        let (events, rx) = mpsc::unbounded_channel();
        let channel = Self {
            attempts: Mutex::new(Vec::new()),
            photo_failures: Mutex::new(VecDeque::new()),
            events,
        };
        (channel, rx)
    }

    /// The next photo send fails with `err`.
    pub fn fail_next_photo(&self, err: DeliveryError) {
        self.photo_failures.lock().unwrap().push_back(err);
    }

    pub fn attempts(&self) -> Vec<Delivered> {
        self.attempts.lock().unwrap().clone()
    }

    fn record(&self, delivered: Delivered) {
        self.attempts.lock().unwrap().push(delivered.clone());
        let _ = self.events.send(DeliveryAttempt {
            at: Instant::now(),
            delivered,
        });
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    async fn send_photo(
        &self,
        to: &Destination,
        image: RenderedImage,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        self.record(Delivered::Photo {
            to: to.clone(),
            caption: caption.to_owned(),
            bytes: image.len(),
        });
        match self.photo_failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn send_text(&self, to: &Destination, text: &str) -> Result<(), DeliveryError> {
        self.record(Delivered::Text {
            to: to.clone(),
            text: text.to_owned(),
        });
        Ok(())
    }
}

/// Writes a solid-colour PNG template to the temp dir.
pub fn write_template(name: &str, width: u32, height: u32) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "frog-template-{}-{}.png",
        name,
        std::process::id()
    ));
    RgbaImage::from_pixel(width, height, Rgba([40, 120, 60, 255]))
        .save(&path)
        .unwrap();
    path
}

/// First installed TrueType candidate at `size`, if the host has one.
pub fn system_font(size: f32) -> Option<OverlayFont> {
    FONT_CANDIDATES
        .iter()
        .find_map(|path| OverlayFont::from_file(Path::new(path), size).ok())
}
