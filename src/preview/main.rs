//! Offline preview of the price overlay.
//!
//! Renders the template with the given prices and writes the PNG to disk,
//! without touching the network or Telegram.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use frog_price_bot::config::BotSettings;
use frog_price_bot::render::{ImageRenderer, OverlayFont, overlay_text};

/// Price overlay previewer.
#[derive(Parser, Debug)]
#[command(name = "frog_preview")]
#[command(about = "Renders the BTC/ETH overlay onto the template image")]
#[command(version)]
struct Args {
    /// BTC price in USD.
    #[arg(long)]
    btc: f64,

    /// ETH price in USD.
    #[arg(long)]
    eth: f64,

    /// Template image (defaults to TEMPLATE_PATH or frog.png next to the bot).
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Font file to try before the built-in candidates.
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Use the built-in bitmap font only.
    #[arg(long)]
    bitmap: bool,

    /// Output PNG path.
    #[arg(short, long, default_value = "preview.png")]
    out: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let settings = BotSettings::from_env_with_defaults();

    let template = args.template.unwrap_or(settings.template_path);
    let font = if args.bitmap {
        OverlayFont::bitmap()
    } else {
        let mut candidates = settings.font_candidates;
        if let Some(font) = args.font {
            candidates.insert(0, font);
        }
        OverlayFont::load(&candidates, settings.font_size)
    };

    println!("Template: {}", template.display());
    println!("Font:     {font:?}");
    println!("Text:\n{}", overlay_text(args.btc, args.eth));

    let renderer = ImageRenderer::new(template, font);
    let image = match renderer.render(args.btc, args.eth) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("✗ Render failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match std::fs::write(&args.out, image.as_bytes()) {
        Ok(()) => {
            println!("✓ Preview written to: {} ({} bytes)", args.out.display(), image.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Failed to write {}: {e}", args.out.display());
            ExitCode::FAILURE
        }
    }
}
