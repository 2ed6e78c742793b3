//! Frog Price Bot - Main Entry Point
//!
//! Broadcasts a BTC/ETH price image to a fixed chat every 30 minutes and
//! answers `/price` requests from any chat.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::Bot;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use frog_price_bot::commands::CommandHandler;
use frog_price_bot::config::{BotConfig, BotSettings};
use frog_price_bot::dispatch::UpdateDispatcher;
use frog_price_bot::prices::{PriceFetcher, ReqwestTransport};
use frog_price_bot::render::{ImageRenderer, OverlayFont};
use frog_price_bot::scheduler::{PriceScheduler, SchedulerMessage};
use frog_price_bot::telegram::{DeliveryChannel, TelegramChannel, listener};

/// Telegram bot that posts BTC/ETH prices on a frog.
#[derive(Parser, Debug)]
#[command(name = "frog_bot")]
#[command(about = "Broadcast BTC/ETH price images to a Telegram chat")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Template image to draw on (overrides TEMPLATE_PATH).
    #[arg(short, long)]
    template: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load configurations
    let bot_config = BotConfig::from_env().context("Missing BOT_TOKEN or CHAT_ID env vars")?;

    let mut settings = BotSettings::from_env_with_defaults();
    if let Some(template) = args.template {
        settings.template_path = template;
    }

    info!("Frog bot starting... (CHAT_ID={})", bot_config.broadcast);
    debug!("Settings: {:?}", settings);

    // Build the dispatch pipeline
    let transport =
        ReqwestTransport::new(settings.http_timeout).context("Failed to build HTTP client")?;
    let fetcher = PriceFetcher::new(Arc::new(transport));

    let font = OverlayFont::load(&settings.font_candidates, settings.font_size);
    let renderer = ImageRenderer::new(settings.template_path.clone(), font);
    if !renderer.template_path().is_file() {
        warn!(
            "Template image not found at {}; updates will fail until it exists",
            renderer.template_path().display()
        );
    }

    let bot = Bot::new(&bot_config.bot_token);
    let channel: Arc<dyn DeliveryChannel> = Arc::new(TelegramChannel::new(bot.clone()));

    let dispatcher = Arc::new(UpdateDispatcher::new(
        fetcher,
        renderer,
        Arc::clone(&channel),
        bot_config.broadcast.clone(),
    ));

    // Spawn scheduler task
    let (scheduler_tx, scheduler_rx) = mpsc::channel::<SchedulerMessage>(8);
    let scheduler =
        PriceScheduler::new(Arc::clone(&dispatcher)).with_update_interval(settings.update_interval);
    let scheduler_handle = tokio::spawn(scheduler.run(scheduler_rx));

    // Listen for commands until Ctrl+C
    listener::prepare(&bot).await;
    let handler = Arc::new(CommandHandler::new(dispatcher, channel));
    listener::listen(bot, handler).await;

    // Cleanup
    info!("Shutting down...");
    let _ = scheduler_tx.send(SchedulerMessage::Shutdown).await;
    match scheduler_handle.await {
        Ok(state) => info!(
            "Scheduler stopped after {} dispatches ({} failed)",
            state.dispatch_count, state.failed_count
        ),
        Err(e) => warn!("Scheduler task ended abnormally: {}", e),
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
