//! Overlay font selection.
//!
//! A list of TrueType/OpenType candidates is tried in order; if none of
//! them load, text is drawn with the built-in 8x8 bitmap font.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use font8x8::UnicodeFonts;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, info, warn};

/// Bitmap glyphs are 8x8 cells, each bit drawn as a square of this size.
pub const BITMAP_SCALE: u32 = 4;

const BITMAP_CELL: u32 = 8;

/// Font used to draw the overlay.
#[derive(Clone)]
pub enum OverlayFont {
    /// Vector font loaded from disk.
    Vector {
        font: FontArc,
        scale: PxScale,
        source: PathBuf,
    },
    /// Built-in bitmap font.
    Bitmap { scale: u32 },
}

impl OverlayFont {
    /// Loads the first candidate that parses, falling back to the bitmap font.
    pub fn load(candidates: &[PathBuf], size: f32) -> Self {
        for path in candidates {
            match Self::from_file(path, size) {
                Ok(font) => {
                    info!("Loaded overlay font {}", path.display());
                    return font;
                }
                Err(e) => debug!("Skipping font {}: {}", path.display(), e),
            }
        }
        warn!("Could not load TTF font; using default bitmap font.");
        Self::bitmap()
    }

    /// Loads a single font file.
    pub fn from_file(path: &Path, size: f32) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| e.to_string())?;
        Ok(Self::Vector {
            font,
            scale: PxScale::from(size),
            source: path.to_path_buf(),
        })
    }

    /// The built-in fallback font.
    #[must_use]
    pub const fn bitmap() -> Self {
        Self::Bitmap {
            scale: BITMAP_SCALE,
        }
    }

    /// Height of one line of text, without spacing.
    #[must_use]
    pub fn line_height(&self) -> u32 {
        match self {
            Self::Vector { font, scale, .. } => font.as_scaled(*scale).height().ceil() as u32,
            Self::Bitmap { scale } => BITMAP_CELL * scale,
        }
    }

    /// Width of a single line of text.
    #[must_use]
    pub fn line_width(&self, line: &str) -> u32 {
        match self {
            Self::Vector { font, scale, .. } => text_size(*scale, font, line).0,
            Self::Bitmap { scale } => line.chars().count() as u32 * BITMAP_CELL * scale,
        }
    }

    /// Draws a single line with its top-left corner at `(x, y)`.
    pub fn draw_line(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, line: &str) {
        match self {
            Self::Vector { font, scale, .. } => {
                draw_text_mut(canvas, color, x, y, *scale, font, line);
            }
            Self::Bitmap { scale } => draw_bitmap_line(canvas, color, x, y, *scale, line),
        }
    }
}

fn draw_bitmap_line(canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, scale: u32, line: &str) {
    let step = (BITMAP_CELL * scale) as i32;
    let scale = scale as i32;

    for (index, ch) in line.chars().enumerate() {
        let Some(glyph) = font8x8::BASIC_FONTS.get(ch) else {
            continue;
        };
        let origin_x = x + index as i32 * step;

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..BITMAP_CELL as i32 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col * scale;
                let py = y + row as i32 * scale;
                fill_square(canvas, color, px, py, scale);
            }
        }
    }
}

fn fill_square(canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, size: i32) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    for dy in 0..size {
        for dx in 0..size {
            let (px, py) = (x + dx, y + dy);
            if px >= 0 && py >= 0 && px < width && py < height {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

impl std::fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vector { scale, source, .. } => f
                .debug_struct("Vector")
                .field("source", source)
                .field("scale", &scale.y)
                .finish_non_exhaustive(),
            Self::Bitmap { scale } => f.debug_struct("Bitmap").field("scale", scale).finish(),
        }
    }
}
