//! Resampling filter kernels.
//!
//! A [`FilterKernel`] answers one question: for destination pixel `d` along
//! an axis, which source pixels contribute and with what weight. Both
//! kernels are separable, so the generator asks once per axis and combines
//! the two tap lists.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │    MipGenerator     │
//! │                     │
//! │ Arc<dyn FilterKernel>
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   FilterKernel      │ (trait)
//! └──────────┬──────────┘
//!            │
//!       ┌────┴────┐
//!       ▼         ▼
//! ┌──────────┐ ┌──────────┐
//! │BoxFilter │ │ Kaiser   │
//! │  (2×2)   │ │ Filter   │
//! └──────────┘ └──────────┘
//! ```
//!
//! [`FilterSpec`] is the plain, copyable description carried in
//! configuration; [`FilterSpec::kernel`] turns it into a kernel.
//!
//! # Edge handling
//!
//! Source offsets outside `[0, extent - 1]` are clamped to the nearest edge
//! pixel. Taps that collapse onto the same offset are merged, and the final
//! list is renormalized to sum to 1.

mod box_filter;
mod kaiser;

pub use box_filter::BoxFilter;
pub use kaiser::{bessel_i0, KaiserFilter};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Default Kaiser window shape parameter.
pub const DEFAULT_KAISER_ALPHA: f32 = 4.0;

/// Default Kaiser support radius, in destination pixels.
pub const DEFAULT_KAISER_RADIUS: f32 = 3.0;

/// Largest accepted Kaiser alpha. Keeps the Bessel series well converged.
pub const MAX_KAISER_ALPHA: f32 = 20.0;

/// Largest accepted Kaiser support radius, in destination pixels.
pub const MAX_KAISER_RADIUS: f32 = 64.0;

/// One weighted source sample along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Source pixel index, already clamped to the source extent.
    pub offset: usize,
    /// Normalized weight.
    pub weight: f32,
}

/// A separable resampling strategy.
pub trait FilterKernel: Send + Sync + fmt::Debug {
    /// Weighted source taps for destination pixel `dst_index`.
    ///
    /// Offsets are clamped to `[0, src_extent - 1]`, sorted ascending, and
    /// the weights sum to 1.
    fn weights(&self, dst_index: usize, dst_extent: usize, src_extent: usize) -> Vec<Tap>;

    /// Human readable name for logs.
    fn name(&self) -> &str;
}

/// Errors raised when building a kernel from a [`FilterSpec`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// A parameter is out of its valid range.
    #[error("invalid filter parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// The filter name is not recognized.
    #[error("unknown filter '{0}' (expected box or kaiser)")]
    UnknownFilter(String),
}

/// Filter selection carried in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterSpec {
    /// 2×2 average.
    #[default]
    Box,
    /// Kaiser-windowed sinc.
    Kaiser { alpha: f32, support_radius: f32 },
}

impl FilterSpec {
    /// Kaiser filter with the default alpha and support radius.
    pub fn kaiser() -> Self {
        FilterSpec::Kaiser {
            alpha: DEFAULT_KAISER_ALPHA,
            support_radius: DEFAULT_KAISER_RADIUS,
        }
    }

    /// Short lowercase name used in logs and config files.
    pub fn name(&self) -> &'static str {
        match self {
            FilterSpec::Box => "box",
            FilterSpec::Kaiser { .. } => "kaiser",
        }
    }

    /// Check parameters without building a kernel.
    pub fn validate(&self) -> Result<(), FilterError> {
        if let FilterSpec::Kaiser {
            alpha,
            support_radius,
        } = *self
        {
            if !(0.0..=MAX_KAISER_ALPHA).contains(&alpha) {
                return Err(FilterError::InvalidParameter {
                    name: "alpha",
                    value: alpha,
                    reason: "must be in [0, 20]",
                });
            }
            if !(support_radius > 0.0 && support_radius <= MAX_KAISER_RADIUS) {
                return Err(FilterError::InvalidParameter {
                    name: "support_radius",
                    value: support_radius,
                    reason: "must be in (0, 64]",
                });
            }
        }
        Ok(())
    }

    /// Build the kernel this spec describes.
    pub fn kernel(&self) -> Result<Arc<dyn FilterKernel>, FilterError> {
        self.validate()?;
        Ok(match *self {
            FilterSpec::Box => Arc::new(BoxFilter),
            FilterSpec::Kaiser {
                alpha,
                support_radius,
            } => Arc::new(KaiserFilter::new(alpha, support_radius)),
        })
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::Box => write!(f, "box"),
            FilterSpec::Kaiser {
                alpha,
                support_radius,
            } => write!(f, "kaiser(alpha={}, radius={})", alpha, support_radius),
        }
    }
}

impl FromStr for FilterSpec {
    type Err = FilterError;

    /// Parses a filter kind; Kaiser gets default parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "box" => Ok(FilterSpec::Box),
            "kaiser" => Ok(FilterSpec::kaiser()),
            _ => Err(FilterError::UnknownFilter(s.to_string())),
        }
    }
}

/// Precomputed taps for every destination index along one axis.
///
/// Computed once per level and shared read-only by all row workers.
#[derive(Debug, Clone)]
pub struct AxisWeights {
    taps: Vec<Vec<Tap>>,
}

impl AxisWeights {
    /// Evaluate `kernel` for every destination index.
    pub fn compute(kernel: &dyn FilterKernel, dst_extent: usize, src_extent: usize) -> Self {
        let taps = (0..dst_extent)
            .map(|d| kernel.weights(d, dst_extent, src_extent))
            .collect();
        Self { taps }
    }

    /// Taps for destination index `d`.
    #[inline]
    pub fn taps(&self, d: usize) -> &[Tap] {
        &self.taps[d]
    }

    /// Number of destination indices.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// True when there are no destination indices.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

/// Clamp raw `(offset, weight)` pairs to the source and normalize.
///
/// `raw` must be sorted by offset. When the weights cancel out entirely the
/// single sample nearest to `center` is returned instead.
pub(crate) fn clamp_and_normalize(raw: &[(isize, f64)], src_extent: usize, center: f64) -> Vec<Tap> {
    let max = src_extent.saturating_sub(1) as isize;

    let mut merged: Vec<(usize, f64)> = Vec::with_capacity(raw.len());
    for &(offset, weight) in raw {
        let clamped = offset.clamp(0, max) as usize;
        match merged.last_mut() {
            Some((last, w)) if *last == clamped => *w += weight,
            _ => merged.push((clamped, weight)),
        }
    }

    let total: f64 = merged.iter().map(|&(_, w)| w).sum();
    if merged.is_empty() || total.abs() < 1e-12 {
        let nearest = (center.floor() as isize).clamp(0, max) as usize;
        return vec![Tap {
            offset: nearest,
            weight: 1.0,
        }];
    }

    merged
        .into_iter()
        .map(|(offset, w)| Tap {
            offset,
            weight: (w / total) as f32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_is_box() {
        assert_eq!(FilterSpec::default(), FilterSpec::Box);
    }

    #[test]
    fn test_kaiser_defaults() {
        assert_eq!(
            FilterSpec::kaiser(),
            FilterSpec::Kaiser {
                alpha: 4.0,
                support_radius: 3.0
            }
        );
    }

    #[test]
    fn test_validate_rejects_bad_kaiser_parameters() {
        let bad_alpha = FilterSpec::Kaiser {
            alpha: f32::NAN,
            support_radius: 3.0,
        };
        assert!(matches!(
            bad_alpha.validate(),
            Err(FilterError::InvalidParameter { name: "alpha", .. })
        ));

        let bad_radius = FilterSpec::Kaiser {
            alpha: 4.0,
            support_radius: 0.0,
        };
        assert!(matches!(
            bad_radius.kernel(),
            Err(FilterError::InvalidParameter {
                name: "support_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_kaiser_parameters() {
        let huge_radius = FilterSpec::Kaiser {
            alpha: 4.0,
            support_radius: 1e20,
        };
        assert!(matches!(
            huge_radius.validate(),
            Err(FilterError::InvalidParameter {
                name: "support_radius",
                ..
            })
        ));

        let huge_alpha = FilterSpec::Kaiser {
            alpha: 150.0,
            support_radius: 3.0,
        };
        assert!(matches!(
            huge_alpha.kernel(),
            Err(FilterError::InvalidParameter { name: "alpha", .. })
        ));

        let at_limits = FilterSpec::Kaiser {
            alpha: MAX_KAISER_ALPHA,
            support_radius: MAX_KAISER_RADIUS,
        };
        assert!(at_limits.validate().is_ok());
        assert!(FilterSpec::Kaiser {
            alpha: f32::INFINITY,
            support_radius: 3.0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_parse_filter_names() {
        assert_eq!("Box".parse::<FilterSpec>().unwrap(), FilterSpec::Box);
        assert_eq!(
            "kaiser".parse::<FilterSpec>().unwrap(),
            FilterSpec::kaiser()
        );
        let err = "lanczos".parse::<FilterSpec>().unwrap_err();
        assert_eq!(err, FilterError::UnknownFilter("lanczos".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(FilterSpec::Box.to_string(), "box");
        assert_eq!(
            FilterSpec::kaiser().to_string(),
            "kaiser(alpha=4, radius=3)"
        );
    }

    #[test]
    fn test_clamp_merges_collapsed_offsets() {
        let taps = clamp_and_normalize(&[(-2, 1.0), (-1, 1.0), (0, 2.0), (1, 4.0)], 4, 0.5);
        assert_eq!(taps.len(), 2);
        assert_eq!(taps[0].offset, 0);
        assert!((taps[0].weight - 0.5).abs() < 1e-7);
        assert_eq!(taps[1].offset, 1);
        assert!((taps[1].weight - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_clamp_falls_back_to_nearest_when_weights_cancel() {
        let taps = clamp_and_normalize(&[(0, 1.0), (1, -1.0)], 4, 2.5);
        assert_eq!(
            taps,
            vec![Tap {
                offset: 2,
                weight: 1.0
            }]
        );
    }

    #[test]
    fn test_axis_weights_cover_every_destination() {
        let kernel = BoxFilter;
        let axis = AxisWeights::compute(&kernel, 4, 8);
        assert_eq!(axis.len(), 4);
        assert_eq!(axis.taps(3)[0].offset, 6);
        assert_eq!(axis.taps(3)[1].offset, 7);
    }
}
