//! Mip chain generation.
//!
//! [`MipGenerator`] turns one base image into the full chain of successively
//! halved levels, down to and including 1×1:
//!
//! ```text
//! level 0   W × H                  (base, linearized if sRGB)
//! level 1   max(1, W/2) × max(1, H/2)
//! ...
//! level n   1 × 1                  n = floor(log2(max(W, H)))
//! ```
//!
//! Each level is computed from the completed previous one. The previous
//! level is only read; the new level is written row by row through the
//! [`TaskScheduler`], so sequential and parallel runs agree bit for bit.
//!
//! The chain stays in linear light. Encoding back to sRGB is done by
//! [`SourceType::to_output`] when a level is handed to a codec.

mod error;

pub use error::MipError;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::buffer::{ImageBuffer, CHANNELS};
use crate::color::{renormalize_pixels, SourceType};
use crate::config::MipConfig;
use crate::filter::{AxisWeights, FilterKernel, FilterSpec, Tap};
use crate::scheduler::{ExecutionMode, TaskScheduler};

/// Number of levels in the chain for a `width`×`height` base.
///
/// `floor(log2(max(width, height))) + 1`, or 0 for an empty image.
pub fn mip_level_count(width: usize, height: usize) -> usize {
    let largest = width.max(height);
    if largest == 0 {
        return 0;
    }
    largest.ilog2() as usize + 1
}

/// Dimensions of the level after a `width`×`height` one.
#[inline]
pub fn next_level_dims(width: usize, height: usize) -> (usize, usize) {
    ((width / 2).max(1), (height / 2).max(1))
}

/// Generates mip chains for one fixed configuration.
///
/// The generator holds no per-image state; the same generator can be used
/// for any number of images and always produces the same chain for the same
/// input.
#[derive(Debug)]
pub struct MipGenerator {
    config: MipConfig,
    kernel: Arc<dyn FilterKernel>,
    scheduler: TaskScheduler,
}

impl MipGenerator {
    /// Create a generator, building the filter kernel and worker pool.
    pub fn new(config: MipConfig) -> Result<Self, MipError> {
        let kernel = config.filter.kernel()?;
        let scheduler = TaskScheduler::from_mode(config.execution, config.threads)?;
        Ok(Self {
            config,
            kernel,
            scheduler,
        })
    }

    /// The configuration this generator was built with.
    pub fn config(&self) -> &MipConfig {
        &self.config
    }

    /// The scheduler used for each level.
    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    /// Generate the complete chain for `base`.
    ///
    /// `base` holds values as decoded by the codec; sRGB sources are
    /// linearized here before any filtering.
    ///
    /// # Errors
    ///
    /// [`MipError::InvalidDimension`] if `base` has a zero dimension. The
    /// check happens before any level is produced.
    pub fn generate(&self, mut base: ImageBuffer) -> Result<Vec<ImageBuffer>, MipError> {
        let (width, height) = base.dimensions();
        if base.is_empty() {
            return Err(MipError::InvalidDimension { width, height });
        }

        let source_type = self.config.source_type;
        let level_count = mip_level_count(width, height);
        let started = Instant::now();

        source_type.linearize(&mut base);

        let mut chain = Vec::with_capacity(level_count);
        chain.push(base);

        while let Some(prev) = chain.last() {
            if prev.dimensions() == (1, 1) {
                break;
            }
            let level = self.next_level(prev, source_type);
            debug!(
                level = chain.len(),
                width = level.width(),
                height = level.height(),
                "Mip level complete"
            );
            chain.push(level);
        }

        info!(
            width,
            height,
            levels = chain.len(),
            source_type = %source_type,
            filter = %self.config.filter,
            mode = %self.scheduler.mode(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Mip chain generated"
        );

        Ok(chain)
    }

    /// Filter `prev` down to the next level and apply the source policy.
    fn next_level(&self, prev: &ImageBuffer, source_type: SourceType) -> ImageBuffer {
        let (src_w, src_h) = prev.dimensions();
        let (dst_w, dst_h) = next_level_dims(src_w, src_h);

        let x_weights = AxisWeights::compute(self.kernel.as_ref(), dst_w, src_w);
        let y_weights = AxisWeights::compute(self.kernel.as_ref(), dst_h, src_h);

        let mut level = ImageBuffer::new(dst_w, dst_h);
        self.scheduler.for_each_row(&mut level, |y, row| {
            resample_row(prev, &x_weights, y_weights.taps(y), row);
        });

        if source_type.requires_renormalization() {
            let substituted = AtomicUsize::new(0);
            self.scheduler.for_each_row(&mut level, |_, row| {
                let n = renormalize_pixels(row);
                if n > 0 {
                    substituted.fetch_add(n, Ordering::Relaxed);
                }
            });
            let substituted = substituted.into_inner();
            if substituted > 0 {
                warn!(
                    width = dst_w,
                    height = dst_h,
                    substituted,
                    "Degenerate normals replaced with (0, 0, 1)"
                );
            }
        }

        level
    }
}

/// Compute one destination row from the previous level.
///
/// For every destination pixel, each vertical tap contributes the
/// horizontally filtered value of its source row.
fn resample_row(src: &ImageBuffer, x_weights: &AxisWeights, y_taps: &[Tap], out: &mut [f32]) {
    for (x, out_px) in out.chunks_exact_mut(CHANNELS).enumerate() {
        let x_taps = x_weights.taps(x);
        let mut acc = [0.0f32; CHANNELS];
        for y_tap in y_taps {
            let src_row = src.row(y_tap.offset);
            let mut h = [0.0f32; CHANNELS];
            for x_tap in x_taps {
                let i = x_tap.offset * CHANNELS;
                h[0] += x_tap.weight * src_row[i];
                h[1] += x_tap.weight * src_row[i + 1];
                h[2] += x_tap.weight * src_row[i + 2];
            }
            acc[0] += y_tap.weight * h[0];
            acc[1] += y_tap.weight * h[1];
            acc[2] += y_tap.weight * h[2];
        }
        out_px.copy_from_slice(&acc);
    }
}

/// Generate a chain on the calling thread.
///
/// Convenience wrapper for one-off use; build a [`MipGenerator`] to reuse a
/// worker pool across images.
pub fn generate_mip_chain(
    base: ImageBuffer,
    source_type: SourceType,
    filter: FilterSpec,
) -> Result<Vec<ImageBuffer>, MipError> {
    if base.is_empty() {
        return Err(MipError::InvalidDimension {
            width: base.width(),
            height: base.height(),
        });
    }
    let config = MipConfig::new(source_type, filter).with_execution(ExecutionMode::Sequential);
    MipGenerator::new(config)?.generate(base)
}
