use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

use crate::error::{ImageError, Result};
use crate::palette::Color;

/// An RGBA drawing surface.
///
/// Thin wrapper around [`RgbaImage`] with the blending and drawing operations
/// used by the overlay compositor and the launch graphic. All drawing clips to
/// the canvas bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    buffer: RgbaImage,
}

/// Axis-aligned rectangle with inclusive corners, `(x0, y0)` to `(x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle from a top-left corner and a size.
    pub fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0 + 1
    }

    /// Shrink by `amount` on every side.
    pub fn inset(&self, amount: i32) -> Self {
        Self::new(self.x0 + amount, self.y0 + amount, self.x1 - amount, self.y1 - amount)
    }
}

impl Canvas {
    /// Create a canvas from an RGBA image buffer
    pub fn new(buffer: RgbaImage) -> Self {
        Self { buffer }
    }

    /// Create a fully opaque canvas filled with `color`
    pub fn new_filled(width: u32, height: u32, color: Color) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, color.with_alpha(255));
        Self { buffer }
    }

    /// Create a fully transparent canvas
    pub fn new_transparent(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self::new(image.to_rgba8())
    }

    /// Decode an image file into an RGBA canvas
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| ImageError::DecodeFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_image(image))
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.buffer.get_pixel(x, y)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Porter-Duff "over" of a single `color` at `alpha` onto the pixel at `(x, y)`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: u8) {
        if alpha == 0 || !self.in_bounds(x, y) {
            return;
        }
        let pixel = self.buffer.get_pixel_mut(x as u32, y as u32);
        *pixel = blend_over(*pixel, color.with_alpha(alpha));
    }

    /// Alpha-over composite of `layer` with its top-left corner at `(x, y)`.
    pub fn composite_over(&mut self, layer: &RgbaImage, x: i32, y: i32) {
        self.for_each_overlap(layer, x, y, |dst, src| blend_over(dst, src));
    }

    /// Paste `layer` at `(x, y)` using its own alpha channel as the mask.
    ///
    /// Every channel, alpha included, moves towards the layer's value by
    /// `mask / 255`; pixels under a zero mask are left untouched.
    pub fn paste_masked(&mut self, layer: &RgbaImage, x: i32, y: i32) {
        self.for_each_overlap(layer, x, y, |dst, src| {
            let mask = src[3];
            match mask {
                0 => dst,
                255 => src,
                _ => {
                    let m = mask as f32 / 255.0;
                    let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * m).round() as u8;
                    Rgba([
                        mix(dst[0], src[0]),
                        mix(dst[1], src[1]),
                        mix(dst[2], src[2]),
                        mix(dst[3], src[3]),
                    ])
                }
            }
        });
    }

    fn for_each_overlap<F>(&mut self, layer: &RgbaImage, x: i32, y: i32, mut combine: F)
    where
        F: FnMut(Rgba<u8>, Rgba<u8>) -> Rgba<u8>,
    {
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + layer.width() as i32).min(self.width() as i32);
        let y_end = (y + layer.height() as i32).min(self.height() as i32);

        for ty in y_start..y_end {
            for tx in x_start..x_end {
                let src = *layer.get_pixel((tx - x) as u32, (ty - y) as u32);
                let dst = self.buffer.get_pixel_mut(tx as u32, ty as u32);
                *dst = combine(*dst, src);
            }
        }
    }

    /// Resolve all transparency against an opaque black background.
    pub fn flatten(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
            let p = self.buffer.get_pixel(x, y);
            if p[3] == 255 {
                Rgb([p[0], p[1], p[2]])
            } else {
                let a = p[3] as f32 / 255.0;
                let scale = |c: u8| (c as f32 * a).round() as u8;
                Rgb([scale(p[0]), scale(p[1]), scale(p[2])])
            }
        })
    }
}

/// Porter-Duff "over": `result = fg + bg * (1 - fg.alpha)`.
pub fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let result = (fg as f32 * fg_alpha + bg as f32 * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        result.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_over_opaque_foreground_wins() {
        let out = blend_over(Rgba([10, 20, 30, 255]), Rgba([200, 100, 50, 255]));
        assert_eq!(out, Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn test_blend_over_transparent_foreground_is_noop() {
        let bg = Rgba([10, 20, 30, 255]);
        assert_eq!(blend_over(bg, Rgba([200, 100, 50, 0])), bg);
    }

    #[test]
    fn test_blend_over_half() {
        let out = blend_over(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        assert_eq!(out[3], 255);
        assert!((127..=129).contains(&out[0]));
    }

    #[test]
    fn test_paste_masked_respects_mask() {
        let mut canvas = Canvas::new_filled(4, 4, Color::new(10, 10, 10));
        let mut layer = RgbaImage::new(2, 2);
        layer.put_pixel(0, 0, Rgba([250, 0, 0, 255]));
        layer.put_pixel(1, 0, Rgba([250, 0, 0, 0]));

        canvas.paste_masked(&layer, 1, 1);

        assert_eq!(canvas.get_pixel(1, 1), Rgba([250, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(2, 1), Rgba([10, 10, 10, 255]));
        assert_eq!(canvas.get_pixel(0, 0), Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn test_composite_clips_to_bounds() {
        let mut canvas = Canvas::new_filled(3, 3, Color::BLACK);
        let layer = ImageBuffer::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        canvas.composite_over(&layer, -2, 2);

        assert_eq!(canvas.get_pixel(0, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(0, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_flatten_is_opaque() {
        let mut canvas = Canvas::new_transparent(2, 1);
        canvas.blend_pixel(0, 0, Color::WHITE, 255);
        let rgb = canvas.flatten();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_rect_geometry() {
        let rect = Rect::from_size(10, 20, 5, 3);
        assert_eq!(rect, Rect::new(10, 20, 14, 22));
        assert_eq!(rect.width(), 5);
        assert_eq!(rect.height(), 3);
        assert_eq!(rect.inset(1), Rect::new(11, 21, 13, 21));
    }
}
