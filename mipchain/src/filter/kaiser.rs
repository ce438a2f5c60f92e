//! Kaiser-windowed sinc filter.
//!
//! The kernel is evaluated in destination-pixel units: a source pixel whose
//! center lies `x` destination pixels away from the destination center gets
//! weight `sinc(x) · kaiser(x / radius, alpha)`. For a 2:1 reduction a
//! radius of 3 therefore reaches 6 source pixels to each side.
//!
//! Weights are computed in `f64` and normalized before being narrowed to
//! `f32`, so every row worker sees exactly the same tap table.

use std::f64::consts::PI;

use super::{clamp_and_normalize, FilterKernel, Tap, MAX_KAISER_ALPHA, MAX_KAISER_RADIUS};

/// Zeroth-order modified Bessel function of the first kind.
///
/// Power series `Σ ((x/2)^k / k!)²`, summed until terms stop contributing.
pub fn bessel_i0(x: f64) -> f64 {
    let half = x * 0.5;
    let mut sum = 1.0;
    let mut term = 1.0;
    for k in 1..64 {
        let factor = half / k as f64;
        term *= factor * factor;
        sum += term;
        if term < sum * 1e-16 {
            break;
        }
    }
    sum
}

/// Normalized sinc, `sin(πx) / (πx)`.
#[inline]
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-9 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Windowed-sinc downsampling kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KaiserFilter {
    alpha: f64,
    support_radius: f64,
    inv_i0_alpha: f64,
}

impl KaiserFilter {
    /// Create a kernel with the given window shape and support radius.
    ///
    /// Parameters are validated by `FilterSpec::kernel`. Constructed
    /// directly, values are clamped to `[0, MAX_KAISER_ALPHA]` and
    /// `MAX_KAISER_RADIUS`; a non-positive radius yields an all-zero kernel,
    /// which degrades to nearest-sample lookup.
    pub fn new(alpha: f32, support_radius: f32) -> Self {
        let alpha = alpha.clamp(0.0, MAX_KAISER_ALPHA) as f64;
        let support_radius = support_radius.min(MAX_KAISER_RADIUS) as f64;
        Self {
            alpha,
            support_radius,
            inv_i0_alpha: 1.0 / bessel_i0(alpha),
        }
    }

    /// Window shape parameter.
    pub fn alpha(&self) -> f32 {
        self.alpha as f32
    }

    /// Support radius in destination pixels.
    pub fn support_radius(&self) -> f32 {
        self.support_radius as f32
    }

    /// Kaiser window for `t` in `[-1, 1]`.
    fn window(&self, t: f64) -> f64 {
        let r = (1.0 - t * t).max(0.0);
        bessel_i0(self.alpha * r.sqrt()) * self.inv_i0_alpha
    }

    /// Unnormalized kernel value at distance `x` (destination pixels).
    pub fn evaluate(&self, x: f64) -> f64 {
        if x.abs() > self.support_radius {
            return 0.0;
        }
        sinc(x) * self.window(x / self.support_radius)
    }
}

impl Default for KaiserFilter {
    fn default() -> Self {
        Self::new(super::DEFAULT_KAISER_ALPHA, super::DEFAULT_KAISER_RADIUS)
    }
}

impl FilterKernel for KaiserFilter {
    fn weights(&self, dst_index: usize, dst_extent: usize, src_extent: usize) -> Vec<Tap> {
        let scale = src_extent as f64 / dst_extent.max(1) as f64;
        // Never narrower than one source pixel per destination unit
        let step = scale.max(1.0);
        let center = (dst_index as f64 + 0.5) * scale;
        let reach = self.support_radius * step;

        let first = (center - reach).floor() as isize;
        let last = (center + reach).ceil() as isize;

        let span = last.saturating_sub(first).saturating_add(1).max(0) as usize;
        let mut raw = Vec::with_capacity(span);
        for i in first..=last {
            let x = (i as f64 + 0.5 - center) / step;
            let w = self.evaluate(x);
            if w != 0.0 {
                raw.push((i, w));
            }
        }

        clamp_and_normalize(&raw, src_extent, center)
    }

    fn name(&self) -> &str {
        "kaiser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(taps: &[Tap]) -> f32 {
        taps.iter().map(|t| t.weight).sum()
    }

    #[test]
    fn test_bessel_i0_known_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-15);
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008_4).abs() < 1e-12);
        assert!((bessel_i0(4.0) - 11.301_921_952_136_33).abs() < 1e-9);
    }

    #[test]
    fn test_kernel_peaks_at_center_and_vanishes_outside_support() {
        let k = KaiserFilter::default();
        assert!((k.evaluate(0.0) - 1.0).abs() < 1e-12);
        assert!(k.evaluate(0.5) < k.evaluate(0.0));
        assert_eq!(k.evaluate(3.01), 0.0);
        assert_eq!(k.evaluate(-10.0), 0.0);
    }

    #[test]
    fn test_kernel_has_negative_lobe() {
        let k = KaiserFilter::default();
        assert!(k.evaluate(1.5) < 0.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let k = KaiserFilter::default();
        for (dst, src) in [(1usize, 2usize), (2, 4), (8, 16), (3, 7), (1, 1)] {
            for d in 0..dst {
                let taps = k.weights(d, dst, src);
                assert!(
                    (weight_sum(&taps) - 1.0).abs() < 1e-5,
                    "dst {} of {}->{}: sum {}",
                    d,
                    src,
                    dst,
                    weight_sum(&taps)
                );
            }
        }
    }

    #[test]
    fn test_offsets_are_clamped_and_sorted() {
        let k = KaiserFilter::default();
        let taps = k.weights(0, 4, 8);
        assert_eq!(taps[0].offset, 0);
        assert!(taps.iter().all(|t| t.offset < 8));
        assert!(taps.windows(2).all(|w| w[0].offset < w[1].offset));
    }

    #[test]
    fn test_interior_weights_are_symmetric() {
        let k = KaiserFilter::default();
        let taps = k.weights(8, 16, 32);
        let n = taps.len();
        assert!(n >= 10, "expected a wide kernel, got {} taps", n);
        for j in 0..n / 2 {
            assert!(
                (taps[j].weight - taps[n - 1 - j].weight).abs() < 1e-6,
                "tap {} vs {}",
                j,
                n - 1 - j
            );
        }
        // centered on source pixels 16 and 17
        assert_eq!(taps[n / 2 - 1].offset + taps[n / 2].offset, 33);
    }

    #[test]
    fn test_single_source_pixel_gets_full_weight() {
        let taps = KaiserFilter::default().weights(0, 1, 1);
        assert_eq!(taps.len(), 1);
        assert_eq!(taps[0].offset, 0);
        assert!((taps[0].weight - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_direct_construction_clamps_parameters() {
        let k = KaiserFilter::new(500.0, 1e20);
        assert_eq!(k.alpha(), MAX_KAISER_ALPHA);
        assert_eq!(k.support_radius(), MAX_KAISER_RADIUS);
        let taps = k.weights(0, 1, 2);
        assert!(taps.len() <= 2);
        assert!((weight_sum(&taps) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_bessel_i0_at_max_alpha() {
        // I0(20) = 4.355828255955353e7
        let expected = 4.355_828_255_955_353e7;
        assert!((bessel_i0(20.0) - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_accessors() {
        let k = KaiserFilter::new(6.0, 2.0);
        assert_eq!(k.alpha(), 6.0);
        assert_eq!(k.support_radius(), 2.0);
        assert_eq!(k.name(), "kaiser");
    }
}
