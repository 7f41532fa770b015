use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, Rgba32FImage, RgbaImage};
use tracing::{debug, info, warn};

use crate::{
    canvas::Canvas,
    config::Config,
    error::{ImageError, Result},
    overlay::{gradient_band, OverlayLayout, OverlaySpec, VariantRegistry},
    palette::{BrandPalette, Color, BRAND},
    text::{centered_x, FontHandle, FontResolver},
};

/// Where a line of text ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPlacement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
}

/// Geometry of a finished overlay, reported for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPlacement {
    pub band_top: u32,
    pub headline: TextPlacement,
    pub subtitle: TextPlacement,
    pub logo_applied: bool,
}

/// Applies the branded overlay (gradient band, captions, logo) to marketing images.
///
/// The compositor holds only read-only state; fonts and image buffers are
/// acquired per call and released when the call returns.
pub struct OverlayCompositor {
    layout: OverlayLayout,
    palette: BrandPalette,
    fonts: FontResolver,
    quality: u8,
}

impl OverlayCompositor {
    pub fn new(layout: OverlayLayout, fonts: FontResolver) -> Self {
        Self {
            layout,
            palette: BRAND,
            fonts,
            quality: 95,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.overlay.clone(), config.font_resolver()).with_quality(config.output.quality)
    }

    /// Encoder quality for lossy output (1-100)
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn layout(&self) -> &OverlayLayout {
        &self.layout
    }

    /// Decode `source`, apply the overlay and write the flattened result to `output`.
    ///
    /// The source file is only read.
    pub fn compose<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        spec: &OverlaySpec,
        output: Q,
    ) -> Result<OverlayPlacement> {
        let source = source.as_ref();
        let output = output.as_ref();

        debug!("Composing overlay {:?} -> {:?}", source, output);
        let mut canvas = Canvas::open(source)?;
        let placement = self.apply(&mut canvas, spec)?;
        canvas.save(output, self.quality)?;

        info!("Saved overlay: {:?} ({}x{})", output, canvas.width(), canvas.height());
        Ok(placement)
    }

    /// Apply the overlay to a canvas in place.
    pub fn apply(&self, canvas: &mut Canvas, spec: &OverlaySpec) -> Result<OverlayPlacement> {
        if canvas.width() == 0 || canvas.height() == 0 {
            return Err(ImageError::InvalidDimensions {
                width: canvas.width(),
                height: canvas.height(),
            }
            .into());
        }

        let band_top = self.apply_band(canvas);

        let headline_font = self.fonts.load(&self.layout.headline_font, self.layout.headline_size);
        let headline = self.draw_caption(
            canvas,
            &headline_font,
            &spec.headline,
            self.layout.headline_bottom_offset,
            self.layout.headline_shadow_offset,
            self.palette.white,
        );

        let subtitle_font = self.fonts.load(&self.layout.subtitle_font, self.layout.subtitle_size);
        let subtitle = self.draw_caption(
            canvas,
            &subtitle_font,
            &spec.subtitle,
            self.layout.subtitle_bottom_offset,
            self.layout.subtitle_shadow_offset,
            self.palette.amber,
        );

        let logo_applied = match spec.logo.as_deref() {
            Some(logo) => self.paste_logo(canvas, logo)?,
            None => false,
        };

        Ok(OverlayPlacement {
            band_top,
            headline,
            subtitle,
            logo_applied,
        })
    }

    /// Composite the dark-navy gradient onto the bottom of the canvas.
    /// Returns the first row covered by the band.
    fn apply_band(&self, canvas: &mut Canvas) -> u32 {
        let band_height = self.layout.band_height.min(canvas.height());
        let band_top = canvas.height() - band_height;

        let band = gradient_band(
            canvas.width(),
            band_height,
            self.palette.dark_navy,
            self.layout.band_opacity,
        );
        canvas.composite_over(&band, 0, band_top as i32);

        debug!("Gradient band: {} rows from y={}", band_height, band_top);
        band_top
    }

    /// Draw a horizontally centred caption with its drop shadow underneath.
    ///
    /// The inked extent is centred, so `x` in the returned placement is the
    /// first inked column rather than the pen origin.
    fn draw_caption(
        &self,
        canvas: &mut Canvas,
        font: &FontHandle,
        text: &str,
        bottom_offset: u32,
        shadow_offset: i32,
        fill: Color,
    ) -> TextPlacement {
        let metrics = font.measure(text);
        let width = metrics.width;
        let x = centered_x(canvas.width(), width);
        let y = canvas.height() as i32 - bottom_offset as i32;
        let pen_x = x - metrics.left;

        // Shadow first so the fill lands on top of it
        canvas.draw_text(
            font,
            text,
            pen_x + shadow_offset,
            y + shadow_offset,
            Color::BLACK,
            self.layout.shadow_alpha,
        );
        canvas.draw_text(font, text, pen_x, y, fill, 255);

        debug!("Caption {:?}: width={} at ({}, {})", text, width, x, y);
        TextPlacement { x, y, width }
    }

    /// Resize the logo to the fixed square footprint and paste it through its
    /// own alpha. A path that does not exist is skipped.
    fn paste_logo(&self, canvas: &mut Canvas, logo_path: &Path) -> Result<bool> {
        if !logo_path.is_file() {
            warn!("Logo {:?} not found, continuing without it", logo_path);
            return Ok(false);
        }

        let logo = Canvas::open(logo_path)?;
        let resized = resize_premultiplied(logo.as_image(), self.layout.logo_size);

        let (x, y) = self.layout.logo_offset;
        canvas.paste_masked(&resized, x, y);
        Ok(true)
    }
}

/// Lanczos3 resize of a straight-alpha image into a `size`×`size` square.
///
/// Filtering runs on premultiplied color so fully transparent pixels
/// contribute nothing to their neighbours.
fn resize_premultiplied(image: &RgbaImage, size: u32) -> RgbaImage {
    let premultiplied: Rgba32FImage = ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let channel = |c: u8| c as f32 / 255.0 * alpha;
        Rgba([channel(r), channel(g), channel(b), alpha])
    });

    let resized = imageops::resize(&premultiplied, size, size, FilterType::Lanczos3);

    ImageBuffer::from_fn(size, size, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        if a < 0.5 / 255.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let channel = |c: f32| (c / a * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba([channel(r), channel(g), channel(b), (a * 255.0).round() as u8])
    })
}

/// Compose every registered variant, strictly one after another.
///
/// `source` and `output` paths are resolved against `dir`. Stops at the first
/// failure. Returns the written output paths in order.
pub fn run_batch(
    compositor: &OverlayCompositor,
    registry: &VariantRegistry,
    dir: &Path,
    default_logo: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    info!("Running {} overlay variants in {:?}", registry.len(), dir);

    let mut written = Vec::with_capacity(registry.len());
    for variant in registry.iter() {
        let source = dir.join(&variant.source);
        let output = dir.join(&variant.output);
        let spec = variant.overlay_spec(default_logo);

        info!("Variant '{}'", variant.name);
        compositor.compose(&source, &spec, &output)?;
        written.push(output);
    }

    Ok(written)
}
