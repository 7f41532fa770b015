use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage};
use tracing::debug;

use super::types::Canvas;
use crate::error::{ImageError, Result};

/// Encoding used when persisting a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg { quality: u8 },
    Png,
}

impl OutputFormat {
    /// Pick the encoder from the file extension. Anything that is not `.png`
    /// is written as JPEG at `quality`.
    pub fn for_path<P: AsRef<Path>>(path: P, quality: u8) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => OutputFormat::Png,
            _ => OutputFormat::Jpeg { quality },
        }
    }
}

impl Canvas {
    /// Flatten to opaque RGB and write to `path`, choosing the encoder by extension.
    pub fn save<P: AsRef<Path>>(&self, path: P, quality: u8) -> Result<()> {
        let path = path.as_ref();
        let format = OutputFormat::for_path(path, quality);
        debug!("Encoding {}x{} canvas as {:?} to {:?}", self.width(), self.height(), format, path);
        write_rgb(&self.flatten(), path, format)
    }
}

/// Encode an opaque RGB image to `path`.
pub fn write_rgb(image: &RgbImage, path: &Path, format: OutputFormat) -> Result<()> {
    let encode_failed = |reason: String| ImageError::EncodeFailed {
        path: path.display().to_string(),
        reason,
    };

    let file = File::create(path).map_err(|e| encode_failed(e.to_string()))?;
    let mut writer = BufWriter::new(file);

    let (width, height) = image.dimensions();
    match format {
        OutputFormat::Jpeg { quality } => {
            JpegEncoder::new_with_quality(&mut writer, quality)
                .encode(image.as_raw(), width, height, ColorType::Rgb8)
                .map_err(|e| encode_failed(e.to_string()))?;
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut writer)
                .write_image(image.as_raw(), width, height, ColorType::Rgb8)
                .map_err(|e| encode_failed(e.to_string()))?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Color;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::for_path("a.PNG", 95), OutputFormat::Png);
        assert_eq!(OutputFormat::for_path("a.jpg", 95), OutputFormat::Jpeg { quality: 95 });
        assert_eq!(OutputFormat::for_path("a.jpeg", 80), OutputFormat::Jpeg { quality: 80 });
        assert_eq!(OutputFormat::for_path("noext", 95), OutputFormat::Jpeg { quality: 95 });
    }

    #[test]
    fn test_save_writes_opaque_rgb() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut canvas = Canvas::new_transparent(4, 3);
        canvas.blend_pixel(1, 1, Color::WHITE, 255);
        canvas.save(&path, 95).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.jpg");
        let canvas = Canvas::new_filled(2, 2, Color::BLACK);

        let err = canvas.save(&path, 95).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CompositorError::Image(ImageError::EncodeFailed { .. })
        ));
    }
}
