use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use tracing::{debug, warn};

use super::builtin;

/// Where a loaded font came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Builtin,
}

/// Measured extent of a rendered string, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    /// Horizontal ink extent, or the advance width if nothing is inked
    pub width: u32,

    /// Line height
    pub height: u32,

    /// Offset of the first inked column from the pen origin
    pub left: i32,
}

enum FontFace {
    Outline(FontVec),
    Bitmap { scale: u32 },
}

/// A font bound to a pixel size.
///
/// Handles are created per call and dropped when the call returns.
pub struct FontHandle {
    face: FontFace,
    size: f32,
    source: FontSource,
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("source", &self.source)
            .field("size", &self.size)
            .finish()
    }
}

impl FontHandle {
    /// Parse a font file. Returns `None` if the bytes are not a usable font.
    pub fn from_file(path: &Path, size: f32) -> Option<Self> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not read font {:?}: {}", path, e);
                return None;
            }
        };

        match FontVec::try_from_vec(data) {
            Ok(font) => Some(Self {
                face: FontFace::Outline(font),
                size,
                source: FontSource::File(path.to_path_buf()),
            }),
            Err(e) => {
                warn!("Could not parse font {:?}: {}", path, e);
                None
            }
        }
    }

    /// The built-in bitmap face at the closest integer scale.
    pub fn builtin(size: f32) -> Self {
        Self {
            face: FontFace::Bitmap {
                scale: builtin::scale_for_size(size),
            },
            size,
            source: FontSource::Builtin,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn is_builtin(&self) -> bool {
        self.source == FontSource::Builtin
    }

    /// Measure the horizontal ink extent and line height of `text`.
    pub fn measure(&self, text: &str) -> TextMetrics {
        match &self.face {
            FontFace::Bitmap { scale } => {
                let cell = builtin::CELL * scale;
                match builtin::ink_columns(text) {
                    Some((first, last)) => TextMetrics {
                        width: (last - first + 1) * scale,
                        height: cell,
                        left: (first * scale) as i32,
                    },
                    None => TextMetrics {
                        width: text.chars().count() as u32 * cell,
                        height: cell,
                        left: 0,
                    },
                }
            }
            FontFace::Outline(font) => {
                let scaled = font.as_scaled(PxScale::from(self.size));
                let height = (scaled.ascent() - scaled.descent()).ceil() as u32;

                let mut min_x = f32::INFINITY;
                let mut max_x = f32::NEG_INFINITY;
                let advance = self.layout(font, text, |glyph| {
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        min_x = min_x.min(bounds.min.x);
                        max_x = max_x.max(bounds.max.x);
                    }
                });

                if max_x > min_x {
                    TextMetrics {
                        width: (max_x - min_x).round() as u32,
                        height,
                        left: min_x.round() as i32,
                    }
                } else {
                    TextMetrics {
                        width: advance.ceil() as u32,
                        height,
                        left: 0,
                    }
                }
            }
        }
    }

    /// Plot glyph coverage for `text`.
    ///
    /// Coordinates are relative to the top-left of the line box: the pen starts
    /// at `x = 0` and the ascender line sits at `y = 0`.
    pub fn rasterize<F: FnMut(i32, i32, f32)>(&self, text: &str, mut plot: F) {
        match &self.face {
            FontFace::Bitmap { scale } => builtin::rasterize(text, *scale, plot),
            FontFace::Outline(font) => {
                self.layout(font, text, |glyph| {
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|px, py, coverage| {
                            plot(
                                bounds.min.x as i32 + px as i32,
                                bounds.min.y as i32 + py as i32,
                                coverage,
                            );
                        });
                    }
                });
            }
        }
    }

    /// Position each glyph of `text` on the baseline and hand it to `visit`.
    /// Returns the total advance width.
    fn layout<V: FnMut(ab_glyph::Glyph)>(&self, font: &FontVec, text: &str, mut visit: V) -> f32 {
        let scale = PxScale::from(self.size);
        let scaled = font.as_scaled(scale);
        let baseline = scaled.ascent();

        let mut cursor_x = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                cursor_x += scaled.kern(prev, id);
            }
            visit(id.with_scale_and_position(scale, point(cursor_x, baseline)));
            cursor_x += scaled.h_advance(id);
            prev = Some(id);
        }
        cursor_x
    }
}

/// Resolves font names to loaded [`FontHandle`]s.
///
/// Lookup order: `font_dir/name`, `font_dir/name.ttf`, `font_dir/name.otf`,
/// then each configured system font, then the built-in bitmap face.
#[derive(Debug, Clone, Default)]
pub struct FontResolver {
    font_dir: Option<PathBuf>,
    system_fonts: Vec<PathBuf>,
}

impl FontResolver {
    pub fn new<P: Into<PathBuf>>(font_dir: P, system_fonts: Vec<PathBuf>) -> Self {
        Self {
            font_dir: Some(font_dir.into()),
            system_fonts,
        }
    }

    /// A resolver that always yields the built-in face.
    pub fn builtin_only() -> Self {
        Self::default()
    }

    /// Candidate paths for `name` inside the font directory, in lookup order.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        match &self.font_dir {
            Some(dir) => vec![
                dir.join(name),
                dir.join(format!("{name}.ttf")),
                dir.join(format!("{name}.otf")),
            ],
            None => Vec::new(),
        }
    }

    /// Load `name` at `size` pixels. Never fails: the built-in face is the last resort.
    pub fn load(&self, name: &str, size: f32) -> FontHandle {
        for path in self.candidates(name) {
            if !path.is_file() {
                continue;
            }
            if let Some(handle) = FontHandle::from_file(&path, size) {
                debug!("Font '{}' resolved to {:?}", name, path);
                return handle;
            }
        }

        for path in &self.system_fonts {
            if !path.is_file() {
                continue;
            }
            if let Some(handle) = FontHandle::from_file(path, size) {
                warn!("Font '{}' not found, falling back to {:?}", name, path);
                return handle;
            }
        }

        warn!("Font '{}' not found, using built-in bitmap font", name);
        FontHandle::builtin(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_candidate_order() {
        let resolver = FontResolver::new("/fonts", vec![]);
        let candidates = resolver.candidates("Outfit-Regular");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/fonts/Outfit-Regular"),
                PathBuf::from("/fonts/Outfit-Regular.ttf"),
                PathBuf::from("/fonts/Outfit-Regular.otf"),
            ]
        );
    }

    #[test]
    fn test_missing_font_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let resolver = FontResolver::new(dir.path(), vec![dir.path().join("nope.ttf")]);
        let font = resolver.load("BigShoulders-Bold", 56.0);
        assert!(font.is_builtin());
        assert_eq!(font.size(), 56.0);
    }

    #[test]
    fn test_corrupt_font_is_skipped() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.ttf"), b"not a font").unwrap();

        let resolver = FontResolver::new(dir.path(), vec![]);
        let font = resolver.load("Broken", 24.0);
        assert!(font.is_builtin());
    }

    /// Horizontal span `[min, max]` of every pixel the font plots for `text`.
    fn plotted_span(font: &FontHandle, text: &str) -> Option<(i32, i32)> {
        let mut span: Option<(i32, i32)> = None;
        font.rasterize(text, |x, _, _| {
            span = Some(match span {
                Some((min, max)) => (min.min(x), max.max(x)),
                None => (x, x),
            });
        });
        span
    }

    /// First font file from the default fallback list that exists on this machine.
    fn system_font() -> Option<PathBuf> {
        crate::config::PathsConfig::default()
            .system_fonts
            .into_iter()
            .find(|path| path.is_file())
    }

    #[test]
    fn test_builtin_measure_is_ink_extent() {
        // 56px maps to scale 4: 'C' inks columns 0..=6, 'Y' columns 0..=5
        let font = FontHandle::builtin(56.0);
        let metrics = font.measure("CY");
        assert_eq!(
            metrics,
            TextMetrics {
                width: (8 + 6) * 4,
                height: 32,
                left: 0
            }
        );

        let padded = font.measure(" Y");
        assert_eq!(padded.left, 32);
        assert_eq!(padded.width, 6 * 4);
    }

    #[test]
    fn test_builtin_blank_text_uses_advance() {
        let font = FontHandle::builtin(16.0);
        assert_eq!(font.measure("  ").width, 2 * 8);
        assert_eq!(font.measure("").width, 0);
    }

    #[test]
    fn test_rasterize_matches_measure() {
        let font = FontHandle::builtin(26.0);
        let metrics = font.measure("Hello");
        let (min, max) = plotted_span(&font, "Hello").unwrap();
        assert_eq!(min, metrics.left);
        assert_eq!((max - min + 1) as u32, metrics.width);
        font.rasterize("Hello", |_, y, _| assert!(y >= 0 && (y as u32) < metrics.height));
    }

    #[test]
    fn test_outline_measure_matches_rasterize() {
        let Some(path) = system_font() else { return };
        let font = FontHandle::from_file(&path, 56.0).unwrap();
        assert!(!font.is_builtin());

        for text in ["COMPETE WITH YOUR FAMILY", "Household leaderboards  •  Real rewards", "AVAWAY"] {
            let metrics = font.measure(text);
            let (min, max) = plotted_span(&font, text).unwrap();
            assert_eq!(min, metrics.left, "{text}");
            assert_eq!((max - min + 1) as u32, metrics.width, "{text}");
        }
    }

    #[test]
    fn test_outline_coverage_is_fractional() {
        let Some(path) = system_font() else { return };
        let font = FontHandle::from_file(&path, 26.0).unwrap();

        let mut full = 0;
        let mut partial = 0;
        font.rasterize("Real rewards", |_, _, coverage| {
            if coverage >= 0.999 {
                full += 1;
            } else if coverage > 0.0 {
                partial += 1;
            }
        });
        assert!(full > 0);
        assert!(partial > 0);
    }

    #[test]
    fn test_system_font_fallback() {
        let Some(path) = system_font() else { return };
        let dir = tempdir().unwrap();
        let resolver = FontResolver::new(dir.path(), vec![dir.path().join("missing.ttf"), path.clone()]);

        let font = resolver.load("BigShoulders-Bold", 56.0);
        assert_eq!(font.source(), &FontSource::File(path));
    }
}
