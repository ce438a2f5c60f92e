//! Error types for mip chain generation.

use thiserror::Error;

use crate::filter::FilterError;
use crate::scheduler::SchedulerError;

/// Errors that can occur while generating a mip chain.
#[derive(Debug, Error)]
pub enum MipError {
    /// The base image has a zero dimension.
    #[error("invalid dimensions {width}×{height}: mip generation needs at least 1×1")]
    InvalidDimension { width: usize, height: usize },

    /// The configured filter is invalid.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The worker pool could not be set up.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
