//! PNG codec backed by the `image` crate.
//!
//! Loading accepts any format the `image` crate can decode (the extension
//! and magic bytes decide); alpha is discarded. Saving always writes 8-bit
//! RGB PNG.

use std::path::Path;

use tracing::trace;

use super::{CodecError, ImageCodec};
use crate::buffer::ImageBuffer;

/// Quantize a `[0, 1]` float to 8 bits, rounding to nearest.
#[inline]
pub(crate) fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// 8-bit RGB PNG codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl PngCodec {
    /// Create a PNG codec.
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for PngCodec {
    fn load(&self, path: &Path) -> Result<ImageBuffer, CodecError> {
        let load_err = |reason: String| CodecError::Load {
            path: path.to_path_buf(),
            reason,
        };

        let decoded = image::open(path).map_err(|e| load_err(e.to_string()))?;
        let rgb = decoded.to_rgb32f();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);

        trace!(path = %path.display(), width, height, "Image decoded");

        ImageBuffer::from_pixels(width, height, rgb.into_raw()).map_err(|e| load_err(e.to_string()))
    }

    fn save(&self, path: &Path, image: &ImageBuffer) -> Result<(), CodecError> {
        let save_err = |reason: String| CodecError::Save {
            path: path.to_path_buf(),
            reason,
        };

        let width = u32::try_from(image.width())
            .map_err(|_| save_err(format!("width {} exceeds PNG limits", image.width())))?;
        let height = u32::try_from(image.height())
            .map_err(|_| save_err(format!("height {} exceeds PNG limits", image.height())))?;

        let bytes: Vec<u8> = image.pixels().iter().map(|&v| quantize(v)).collect();
        let rgb = image::RgbImage::from_raw(width, height, bytes)
            .ok_or_else(|| save_err("pixel data does not match dimensions".to_string()))?;

        rgb.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| save_err(e.to_string()))?;

        trace!(path = %path.display(), width, height, "Image encoded");
        Ok(())
    }

    fn extension(&self) -> &str {
        "png"
    }

    fn name(&self) -> &str {
        "PNG RGB8"
    }
}
