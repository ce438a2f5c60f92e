//! In-memory RGB raster used by every stage of mip generation.
//!
//! An [`ImageBuffer`] stores three `f32` channels per pixel, row-major, with
//! a pitch of `width * 3`. Values held in a buffer are always linear light
//! once they are inside the generator; the codec boundary is the only place
//! where gamma-encoded values appear.

use thiserror::Error;

/// Number of channels stored per pixel.
pub const CHANNELS: usize = 3;

/// Errors raised when constructing an [`ImageBuffer`] from raw data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The pixel vector does not match `width * height * 3`.
    #[error("pixel data length {actual} does not match {width}×{height}×3 = {expected}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Linear-float RGB image with explicit dimensions.
///
/// Zero-sized buffers can be constructed so that callers can hand them to
/// the generator and receive a proper `InvalidDimension` error, but every
/// buffer the generator produces is at least 1×1.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    pixels: Vec<f32>,
}

impl ImageBuffer {
    /// Create a black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0.0; width * height * CHANNELS],
        }
    }

    /// Create an image where every pixel has the same color.
    pub fn filled(width: usize, height: usize, rgb: [f32; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width * height * CHANNELS);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [f32; 3],
    {
        let mut pixels = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap an existing pixel vector.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LengthMismatch`] when `pixels.len()` is not
    /// `width * height * 3`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<f32>) -> Result<Self, BufferError> {
        let expected = width * height * CHANNELS;
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` pair.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of floats per row.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width * CHANNELS
    }

    /// True when either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// All pixel values, row-major.
    #[inline]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Mutable access to all pixel values.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.pixels
    }

    /// Consume the buffer and return its pixel vector.
    pub fn into_pixels(self) -> Vec<f32> {
        self.pixels
    }

    /// One row of `pitch()` floats.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let pitch = self.pitch();
        &self.pixels[y * pitch..(y + 1) * pitch]
    }

    /// The RGB triple at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        let i = y * self.pitch() + x * CHANNELS;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Overwrite the RGB triple at `(x, y)`.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        let i = y * self.pitch() + x * CHANNELS;
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Iterate over pixels as RGB triples in row-major order.
    pub fn iter_pixels(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Apply `f` to every channel value in place.
    pub fn map_values<F>(&mut self, f: F)
    where
        F: Fn(f32) -> f32,
    {
        for value in &mut self.pixels {
            *value = f(*value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black_with_expected_len() {
        let image = ImageBuffer::new(4, 3);
        assert_eq!(image.pixels().len(), 36);
        assert_eq!(image.pitch(), 12);
        assert!(image.pixels().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_filled_sets_every_pixel() {
        let image = ImageBuffer::filled(3, 2, [0.1, 0.2, 0.3]);
        assert_eq!(image.iter_pixels().count(), 6);
        assert!(image.iter_pixels().all(|p| p == [0.1, 0.2, 0.3]));
    }

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        let err = ImageBuffer::from_pixels(2, 2, vec![0.0; 11]).unwrap_err();
        assert_eq!(
            err,
            BufferError::LengthMismatch {
                width: 2,
                height: 2,
                expected: 12,
                actual: 11,
            }
        );
        assert!(err.to_string().contains("2×2×3 = 12"));
    }

    #[test]
    fn test_pixel_addressing_is_row_major() {
        let image = ImageBuffer::from_fn(3, 2, |x, y| [x as f32, y as f32, 0.0]);
        assert_eq!(image.pixel(2, 1), [2.0, 1.0, 0.0]);
        assert_eq!(&image.row(1)[..3], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_set_pixel_only_touches_target() {
        let mut image = ImageBuffer::new(2, 2);
        image.set_pixel(1, 0, [1.0, 0.5, 0.25]);
        assert_eq!(image.pixel(1, 0), [1.0, 0.5, 0.25]);
        assert_eq!(image.pixel(0, 0), [0.0; 3]);
        assert_eq!(image.pixel(1, 1), [0.0; 3]);
    }

    #[test]
    fn test_zero_sized_buffer_is_empty() {
        assert!(ImageBuffer::new(0, 5).is_empty());
        assert!(ImageBuffer::new(5, 0).is_empty());
        assert!(!ImageBuffer::new(1, 1).is_empty());
    }
}
