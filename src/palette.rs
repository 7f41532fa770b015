//! # Brand Palette
//!
//! The fixed colors shared by every generated marketing asset. The palette is a
//! `const` and is only ever read.

use image::Rgba;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// This color as an RGBA pixel with the given alpha.
    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }

    /// Shift each channel by a signed amount, saturating at 0 and 255.
    pub fn shifted(self, dr: i32, dg: i32, db: i32) -> Self {
        let shift = |c: u8, d: i32| (c as i32 + d).clamp(0, 255) as u8;
        Self::new(shift(self.r, dr), shift(self.g, dg), shift(self.b, db))
    }

    /// `#RRGGBB` representation.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Named brand colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandPalette {
    pub amber: Color,
    pub deep_orange: Color,
    pub dark_navy: Color,
    pub white: Color,
}

/// The Daily Bag palette.
pub const BRAND: BrandPalette = BrandPalette {
    amber: Color::new(245, 158, 11),      // #F59E0B
    deep_orange: Color::new(234, 88, 12), // #EA580C
    dark_navy: Color::new(20, 27, 45),    // #141B2D
    white: Color::WHITE,
};
