//! Normal vector decoding, renormalization and re-encoding.
//!
//! Normal maps store unit vectors remapped from `[-1, 1]` to `[0, 1]` per
//! channel. Averaging unit vectors shortens them, so every filtered level
//! has to be pushed back onto the unit sphere.

use thiserror::Error;

use crate::buffer::CHANNELS;

/// Vectors shorter than this cannot be normalized reliably.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Substitute for degenerate vectors: straight out of the surface.
pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Errors raised by normal vector operations.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ColorError {
    /// The vector is too close to zero length to define a direction.
    #[error("degenerate normal vector ({x}, {y}, {z}) cannot be normalized")]
    DegenerateVector { x: f32, y: f32, z: f32 },
}

/// Decode a stored `[0, 1]` triple into a `[-1, 1]` vector.
///
/// Channels are not clamped: filtered values may overshoot `[0, 1]`, and
/// clamping a single channel would rotate the vector. Clamping happens at
/// the codec boundary after renormalization.
#[inline]
pub fn decode_normal(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| c * 2.0 - 1.0)
}

/// Encode a `[-1, 1]` vector into a stored `[0, 1]` triple.
#[inline]
pub fn encode_normal(v: [f32; 3]) -> [f32; 3] {
    v.map(|c| c * 0.5 + 0.5)
}

/// Scale `v` to unit length.
///
/// # Errors
///
/// Returns [`ColorError::DegenerateVector`] when `|v|` is below
/// [`DEGENERATE_EPSILON`].
#[inline]
pub fn try_normalize(v: [f32; 3]) -> Result<[f32; 3], ColorError> {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len.is_nan() || len < DEGENERATE_EPSILON {
        return Err(ColorError::DegenerateVector {
            x: v[0],
            y: v[1],
            z: v[2],
        });
    }
    Ok([v[0] / len, v[1] / len, v[2] / len])
}

/// Decode, renormalize and re-encode one stored normal.
pub fn renormalize_encoded(rgb: [f32; 3]) -> Result<[f32; 3], ColorError> {
    try_normalize(decode_normal(rgb)).map(encode_normal)
}

/// Renormalize every stored normal in `pixels` in place.
///
/// Degenerate vectors are replaced by [`DEFAULT_NORMAL`]. Returns how many
/// pixels needed that substitution so the caller can report it.
pub fn renormalize_pixels(pixels: &mut [f32]) -> usize {
    let mut substituted = 0;
    for px in pixels.chunks_exact_mut(CHANNELS) {
        let encoded = match renormalize_encoded([px[0], px[1], px[2]]) {
            Ok(rgb) => rgb,
            Err(ColorError::DegenerateVector { .. }) => {
                substituted += 1;
                encode_normal(DEFAULT_NORMAL)
            }
        };
        px.copy_from_slice(&encoded);
    }
    substituted
}
