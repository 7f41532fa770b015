use image::{ImageBuffer, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::palette::Color;

/// Fixed geometry shared by every overlay variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayLayout {
    /// Height of the bottom gradient band in pixels (clamped to the image height)
    pub band_height: u32,

    /// Alpha multiplier reached at the bottom of the band (0.0-1.0)
    pub band_opacity: f32,

    /// Font name for the headline, resolved against the font directory
    pub headline_font: String,
    pub headline_size: f32,

    /// Distance from the image bottom to the top of the headline line box
    pub headline_bottom_offset: u32,
    pub headline_shadow_offset: i32,

    pub subtitle_font: String,
    pub subtitle_size: f32,
    pub subtitle_bottom_offset: u32,
    pub subtitle_shadow_offset: i32,

    /// Alpha of the black drop shadow behind both text lines
    pub shadow_alpha: u8,

    /// Edge length of the square logo footprint
    pub logo_size: u32,

    /// Top-left corner of the logo
    pub logo_offset: (i32, i32),
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self {
            band_height: 140,
            band_opacity: 0.9,
            headline_font: "BigShoulders-Bold".to_string(),
            headline_size: 56.0,
            headline_bottom_offset: 110,
            headline_shadow_offset: 3,
            subtitle_font: "Outfit-Regular".to_string(),
            subtitle_size: 26.0,
            subtitle_bottom_offset: 50,
            subtitle_shadow_offset: 2,
            shadow_alpha: 180,
            logo_size: 72,
            logo_offset: (16, 12),
        }
    }
}

impl OverlayLayout {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.band_opacity) {
            return Err(ConfigError::InvalidValue {
                key: "overlay.band_opacity".to_string(),
                value: self.band_opacity.to_string(),
            }
            .into());
        }

        if self.band_height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "overlay.band_height".to_string(),
                value: self.band_height.to_string(),
            }
            .into());
        }

        for (key, size) in [
            ("overlay.headline_size", self.headline_size),
            ("overlay.subtitle_size", self.subtitle_size),
        ] {
            if size.is_nan() || size <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: size.to_string(),
                }
                .into());
            }
        }

        if self.logo_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "overlay.logo_size".to_string(),
                value: self.logo_size.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Alpha of band row `y`: linear from 0 at the top towards `255 * opacity`.
pub fn band_alpha(y: u32, band_height: u32, opacity: f32) -> u8 {
    if band_height == 0 {
        return 0;
    }
    let fraction = y as f32 / band_height as f32;
    (fraction * 255.0 * opacity).round().clamp(0.0, 255.0) as u8
}

/// Build the `width`×`band_height` gradient layer in a single color.
pub fn gradient_band(width: u32, band_height: u32, color: Color, opacity: f32) -> RgbaImage {
    ImageBuffer::from_fn(width, band_height, |_, y| {
        color.with_alpha(band_alpha(y, band_height, opacity))
    })
}
