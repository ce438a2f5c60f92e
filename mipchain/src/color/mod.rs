//! Color space conversion and per-source-type color policy.
//!
//! Filtering is only radiometrically correct on linear values, so gamma
//! encoded (sRGB) sources are linearized once when the base level is built
//! and re-encoded once when a level leaves the generator. Data textures are
//! passed through untouched, and normal maps are renormalized after every
//! filtered level instead of being gamma converted.
//!
//! ```text
//!   codec ──► to_linear ──► filter ─► filter ─► ... ──► to_encoded ──► codec
//!  (encoded)   (sRGB only)   (linear working space)      (sRGB only)  (encoded)
//! ```

mod normal;
mod source_type;

pub use normal::{
    decode_normal, encode_normal, renormalize_encoded, renormalize_pixels, try_normalize,
    ColorError, DEFAULT_NORMAL, DEGENERATE_EPSILON,
};
pub use source_type::{ParseSourceTypeError, SourceType};

/// Encoded values below this use the linear segment of the sRGB curve.
pub const SRGB_DECODE_THRESHOLD: f32 = 0.04045;

/// Linear values below this use the linear segment of the sRGB curve.
pub const SRGB_ENCODE_THRESHOLD: f32 = 0.0031308;

/// Convert an sRGB encoded value in `[0, 1]` to linear light.
///
/// The input is clamped to `[0, 1]` first so the power function never sees
/// a negative base.
#[inline]
pub fn to_linear(encoded: f32) -> f32 {
    let e = encoded.clamp(0.0, 1.0);
    if e < SRGB_DECODE_THRESHOLD {
        e / 12.92
    } else {
        ((e + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a linear light value in `[0, 1]` to its sRGB encoding.
///
/// The input is clamped to `[0, 1]` first. Filters with negative lobes can
/// overshoot, so this is where out-of-range values are brought back.
#[inline]
pub fn to_encoded(linear: f32) -> f32 {
    let l = linear.clamp(0.0, 1.0);
    if l < SRGB_ENCODE_THRESHOLD {
        l * 12.92
    } else {
        l.powf(1.0 / 2.4) * 1.055 - 0.055
    }
}

/// Linearize every value of a slice in place.
pub fn linearize_in_place(values: &mut [f32]) {
    for v in values {
        *v = to_linear(*v);
    }
}

/// Encode every value of a slice in place.
pub fn encode_in_place(values: &mut [f32]) {
    for v in values {
        *v = to_encoded(*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoints_map_to_themselves() {
        assert_eq!(to_linear(0.0), 0.0);
        assert_eq!(to_encoded(0.0), 0.0);
        assert!((to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((to_encoded(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mid_grey_is_darker_in_linear() {
        // 0.5 encoded is roughly 0.214 linear
        let l = to_linear(0.5);
        assert!((l - 0.214_041).abs() < 1e-4, "got {}", l);
    }

    #[test]
    fn test_round_trip_at_decode_breakpoint() {
        let x = SRGB_DECODE_THRESHOLD;
        assert!((to_encoded(to_linear(x)) - x).abs() < 1e-5);
        let just_below = x - f32::EPSILON;
        assert!((to_encoded(to_linear(just_below)) - just_below).abs() < 1e-5);
    }

    #[test]
    fn test_round_trip_at_encode_breakpoint() {
        let l = SRGB_ENCODE_THRESHOLD;
        assert!((to_linear(to_encoded(l)) - l).abs() < 1e-5);
        let just_below = l - f32::EPSILON;
        assert!((to_linear(to_encoded(just_below)) - just_below).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        assert_eq!(to_linear(-0.5), 0.0);
        assert_eq!(to_encoded(-0.5), 0.0);
        assert_eq!(to_linear(2.0), to_linear(1.0));
        assert_eq!(to_encoded(2.0), to_encoded(1.0));
    }

    #[test]
    fn test_slice_helpers_match_scalar_functions() {
        let mut values = [0.0, 0.02, 0.5, 0.9, 1.0];
        let expected: Vec<f32> = values.iter().map(|&v| to_linear(v)).collect();
        linearize_in_place(&mut values);
        assert_eq!(values.to_vec(), expected);

        let expected: Vec<f32> = values.iter().map(|&v| to_encoded(v)).collect();
        encode_in_place(&mut values);
        assert_eq!(values.to_vec(), expected);
    }

    proptest! {
        #[test]
        fn prop_encode_inverts_linearize(x in 0.0f32..=1.0f32) {
            let back = to_encoded(to_linear(x));
            prop_assert!((back - x).abs() < 1e-5, "{} -> {}", x, back);
        }

        #[test]
        fn prop_linearize_inverts_encode(l in 0.0f32..=1.0f32) {
            let back = to_linear(to_encoded(l));
            prop_assert!((back - l).abs() < 1e-5, "{} -> {}", l, back);
        }

        #[test]
        fn prop_linearize_is_monotonic(a in 0.0f32..=1.0f32, b in 0.0f32..=1.0f32) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(to_linear(lo) <= to_linear(hi));
        }
    }
}
