//! 2×2 box filter.

use super::{clamp_and_normalize, FilterKernel, Tap};

/// Unweighted average of the two source pixels under each destination
/// pixel, per axis. Applied on both axes this is the classic 2×2 mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxFilter;

impl FilterKernel for BoxFilter {
    fn weights(&self, dst_index: usize, _dst_extent: usize, src_extent: usize) -> Vec<Tap> {
        let first = (2 * dst_index) as isize;
        clamp_and_normalize(
            &[(first, 0.5), (first + 1, 0.5)],
            src_extent,
            first as f64 + 1.0,
        )
    }

    fn name(&self) -> &str {
        "box"
    }
}
