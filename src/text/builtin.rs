//! Built-in 8x8 bitmap face, used when no font file resolves.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

/// Cell size of the bitmap face in unscaled pixels.
pub const CELL: u32 = 8;

// Middle dot used as a separator in subtitles; font8x8 has no U+2022.
const BULLET: [u8; 8] = [0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00];

/// Look up the 8x8 bitmap for a character. Row-major, bit `n` of each row is column `n`.
pub fn glyph_rows(c: char) -> Option<[u8; 8]> {
    if c == '•' {
        return Some(BULLET);
    }
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

// Average advance of a proportional face, as a fraction of its pixel size
const ADVANCE_RATIO: f32 = 0.6;

/// Integer scale factor whose cell width best approximates the advance of a
/// `size` pixel font.
pub fn scale_for_size(size: f32) -> u32 {
    ((size * ADVANCE_RATIO / CELL as f32).round() as u32).max(1)
}

/// Leftmost and rightmost inked column of `text`, in unscaled pixels, or
/// `None` if nothing is inked.
pub fn ink_columns(text: &str) -> Option<(u32, u32)> {
    let mut extent: Option<(u32, u32)> = None;
    for (index, c) in text.chars().enumerate() {
        let Some(rows) = glyph_rows(c) else { continue };
        let bits = rows.iter().fold(0u8, |acc, row| acc | row);
        if bits == 0 {
            continue;
        }
        let origin = index as u32 * CELL;
        let first = origin + bits.trailing_zeros();
        let last = origin + 7 - bits.leading_zeros();
        extent = Some(match extent {
            Some((min, max)) => (min.min(first), max.max(last)),
            None => (first, last),
        });
    }
    extent
}

/// Plot every set bit of `text` as `scale`×`scale` blocks of full coverage.
pub fn rasterize<F: FnMut(i32, i32, f32)>(text: &str, scale: u32, mut plot: F) {
    let cell = (CELL * scale) as i32;
    for (index, c) in text.chars().enumerate() {
        let Some(rows) = glyph_rows(c) else { continue };
        let origin_x = index as i32 * cell;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..CELL {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let bx = origin_x + (col * scale) as i32;
                let by = (row as u32 * scale) as i32;
                for dy in 0..scale as i32 {
                    for dx in 0..scale as i32 {
                        plot(bx + dx, by + dy, 1.0);
                    }
                }
            }
        }
    }
}
