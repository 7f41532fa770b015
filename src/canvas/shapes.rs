//! Filled and outlined shape primitives.
//!
//! Paths are rasterized by `tiny-skia` into a coverage pixmap, without
//! anti-aliasing, then blended onto the canvas in the requested color.

use image::{ImageBuffer, RgbaImage};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use super::types::{Canvas, Rect};
use crate::palette::Color;
use crate::text::FontHandle;

// Control-point distance of a cubic quarter circle with unit radius
const KAPPA: f32 = 0.552_284_8;

enum Draw<'a> {
    Fill(FillRule),
    Stroke(&'a Stroke),
}

impl Canvas {
    /// Rasterize `path` over the pixels of `bounds` and blend `color` through
    /// the resulting coverage at `alpha`.
    fn paint_path(&mut self, path: &Path, draw: Draw<'_>, bounds: tiny_skia::Rect, color: Color, alpha: u8) {
        let x0 = (bounds.left().floor() as i32).max(0);
        let y0 = (bounds.top().floor() as i32).max(0);
        let x1 = (bounds.right().ceil() as i32).min(self.width() as i32);
        let y1 = (bounds.bottom().ceil() as i32).min(self.height() as i32);
        if alpha == 0 || x1 <= x0 || y1 <= y0 {
            return;
        }

        let Some(mut coverage) = Pixmap::new((x1 - x0) as u32, (y1 - y0) as u32) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        paint.anti_alias = false;
        let transform = Transform::from_translate(-x0 as f32, -y0 as f32);

        match draw {
            Draw::Fill(rule) => coverage.fill_path(path, &paint, rule, transform, None),
            Draw::Stroke(stroke) => coverage.stroke_path(path, &paint, stroke, transform, None),
        }

        let width = coverage.width();
        let pixels = coverage.pixels();
        let layer: RgbaImage = ImageBuffer::from_fn(width, coverage.height(), |x, y| {
            let covered = pixels[(y * width + x) as usize].alpha() as u32;
            color.with_alpha(((covered * alpha as u32 + 127) / 255) as u8)
        });
        self.composite_over(&layer, x0, y0);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        if let Some(bounds) = pixel_area(rect) {
            let path = PathBuilder::from_rect(bounds);
            self.paint_path(&path, Draw::Fill(FillRule::Winding), bounds, color, alpha);
        }
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, alpha: u8) {
        let Some(bounds) = pixel_area(rect) else { return };
        if let Some(path) = rounded_rect_path(bounds, radius) {
            self.paint_path(&path, Draw::Fill(FillRule::Winding), bounds, color, alpha);
        }
    }

    /// Outline of a rounded rectangle, `width` pixels thick, drawn inside `rect`.
    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: i32, color: Color) {
        let Some(bounds) = pixel_area(rect) else { return };
        let half = width as f32 / 2.0;

        // The pen runs along a line inset by half the width so the outer edge meets `rect`.
        let centre_line = tiny_skia::Rect::from_ltrb(
            bounds.left() + half,
            bounds.top() + half,
            bounds.right() - half,
            bounds.bottom() - half,
        );
        let Some(centre_line) = centre_line else {
            return self.fill_rounded_rect(rect, radius, color, 255);
        };

        let Some(path) = rounded_rect_path(centre_line, (radius - half).max(0.0)) else { return };
        let stroke = Stroke {
            width: width as f32,
            ..Stroke::default()
        };
        self.paint_path(&path, Draw::Stroke(&stroke), bounds, color, 255);
    }

    /// Ellipse inscribed in `rect`.
    pub fn fill_ellipse(&mut self, rect: Rect, color: Color, alpha: u8) {
        let Some(bounds) = pixel_area(rect) else { return };
        if let Some(path) = PathBuilder::from_oval(bounds) {
            self.paint_path(&path, Draw::Fill(FillRule::Winding), bounds, color, alpha);
        }
    }

    /// Even-odd fill of the closed polygon through `points`.
    pub fn fill_polygon(&mut self, points: &[(i32, i32)], color: Color, alpha: u8) {
        let Some((&(x, y), rest)) = points.split_first() else { return };
        if rest.len() < 2 {
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(x as f32, y as f32);
        for &(x, y) in rest {
            builder.line_to(x as f32, y as f32);
        }
        builder.close();

        if let Some(path) = builder.finish() {
            let bounds = path.bounds();
            self.paint_path(&path, Draw::Fill(FillRule::EvenOdd), bounds, color, alpha);
        }
    }

    /// Draw `text` with the top-left of its line box at `(x, y)`.
    pub fn draw_text(&mut self, font: &FontHandle, text: &str, x: i32, y: i32, color: Color, alpha: u8) {
        font.rasterize(text, |dx, dy, coverage| {
            let a = (coverage.clamp(0.0, 1.0) * alpha as f32).round() as u8;
            self.blend_pixel(x + dx, y + dy, color, a);
        });
    }
}

/// The pixels covered by an inclusive rectangle, as a continuous area.
fn pixel_area(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(
        rect.x0 as f32,
        rect.y0 as f32,
        (rect.x1 + 1) as f32,
        (rect.y1 + 1) as f32,
    )
}

/// Closed rounded-rectangle path; the radius is limited to half the shorter side.
fn rounded_rect_path(rect: tiny_skia::Rect, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    if r == 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }

    let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let k = r * KAPPA;

    let mut builder = PathBuilder::new();
    builder.move_to(left + r, top);
    builder.line_to(right - r, top);
    builder.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    builder.line_to(right, bottom - r);
    builder.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    builder.line_to(left + r, bottom);
    builder.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    builder.line_to(left, top + r);
    builder.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    builder.close();
    builder.finish()
}
