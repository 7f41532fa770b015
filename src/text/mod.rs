//! # Text
//!
//! Font resolution, measurement and glyph rasterization. Outline fonts are
//! rendered with `ab_glyph`; when no font file resolves, a built-in 8x8 bitmap
//! face keeps text rendering available.

mod builtin;
pub mod font;

pub use font::{FontHandle, FontResolver, FontSource, TextMetrics};

/// Horizontal offset that centres a run of `text_width` pixels in `canvas_width`.
///
/// Floor division on signed values, so text wider than the canvas gets a
/// negative offset and is clipped evenly.
pub fn centered_x(canvas_width: u32, text_width: u32) -> i32 {
    (canvas_width as i32 - text_width as i32).div_euclid(2)
}
