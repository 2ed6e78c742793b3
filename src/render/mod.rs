//! Image rendering module.
//!
//! Loads the template image, draws the formatted prices centred on it
//! with a black outline, and encodes the result as PNG in memory.

mod font;
mod format;
mod renderer;

pub use font::{BITMAP_SCALE, OverlayFont};
pub use format::{format_price, overlay_text};
pub use renderer::{
    FILL_COLOR, ImageRenderer, LINE_SPACING, OUTLINE_COLOR, OUTLINE_WIDTH, RenderError,
    RenderedImage,
};
