//! Template image renderer.
//!
//! Drawing order matters: eight black copies of the text at the outline
//! offsets go down first, then the yellow fill at the centred position.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use thiserror::Error;
use tracing::debug;

use super::font::OverlayFont;
use super::format::overlay_text;

/// Outline thickness in pixels.
pub const OUTLINE_WIDTH: i32 = 4;

/// Vertical gap between text lines.
pub const LINE_SPACING: u32 = 10;

const OUTLINE_OFFSETS: [(i32, i32); 8] = [
    (-OUTLINE_WIDTH, -OUTLINE_WIDTH),
    (-OUTLINE_WIDTH, 0),
    (-OUTLINE_WIDTH, OUTLINE_WIDTH),
    (0, -OUTLINE_WIDTH),
    (0, OUTLINE_WIDTH),
    (OUTLINE_WIDTH, -OUTLINE_WIDTH),
    (OUTLINE_WIDTH, 0),
    (OUTLINE_WIDTH, OUTLINE_WIDTH),
];

pub const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const FILL_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Failed to decode template {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
}

/// PNG-encoded image held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    bytes: Vec<u8>,
}

impl RenderedImage {
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reader positioned at the start of the encoded image.
    #[must_use]
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.bytes)
    }
}

/// Draws prices on the template image.
#[derive(Debug, Clone)]
pub struct ImageRenderer {
    template_path: PathBuf,
    font: OverlayFont,
}

impl ImageRenderer {
    #[must_use]
    pub const fn new(template_path: PathBuf, font: OverlayFont) -> Self {
        Self {
            template_path,
            font,
        }
    }

    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Renders both prices onto a fresh copy of the template.
    pub fn render(&self, btc: f64, eth: f64) -> Result<RenderedImage, RenderError> {
        if !self.template_path.is_file() {
            return Err(RenderError::TemplateNotFound(self.template_path.clone()));
        }

        let mut canvas = image::open(&self.template_path)
            .map_err(|source| RenderError::Decode {
                path: self.template_path.clone(),
                source,
            })?
            .into_rgba8();

        let text = overlay_text(btc, eth);
        self.draw_centered(&mut canvas, &text);

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(RenderError::Encode)?;

        debug!("Rendered {} byte PNG for BTC={} ETH={}", bytes.len(), btc, eth);
        Ok(RenderedImage::new(bytes))
    }

    fn draw_centered(&self, canvas: &mut RgbaImage, text: &str) {
        let lines: Vec<&str> = text.lines().collect();
        let widths: Vec<u32> = lines.iter().map(|line| self.font.line_width(line)).collect();
        let line_height = self.font.line_height();

        let block_width = widths.iter().copied().max().unwrap_or(0);
        let block_height = block_size(lines.len() as u32, line_height);

        let origin_x = (canvas.width() as i32 - block_width as i32) / 2;
        let origin_y = (canvas.height() as i32 - block_height as i32) / 2;

        let layers = OUTLINE_OFFSETS
            .iter()
            .map(|&offset| (offset, OUTLINE_COLOR))
            .chain(std::iter::once(((0, 0), FILL_COLOR)));

        for ((dx, dy), color) in layers {
            for (index, (line, width)) in lines.iter().zip(&widths).enumerate() {
                let x = origin_x + (block_width - width) as i32 / 2;
                let y = origin_y + (index as u32 * (line_height + LINE_SPACING)) as i32;
                self.font.draw_line(canvas, color, x + dx, y + dy, line);
            }
        }
    }
}

/// Total height of `lines` lines separated by [`LINE_SPACING`].
fn block_size(lines: u32, line_height: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    lines * line_height + (lines - 1) * LINE_SPACING
}
