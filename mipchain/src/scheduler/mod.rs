//! Row scheduling for one mip level.
//!
//! The generator hands the scheduler a destination buffer and a per-row
//! closure. In [`ExecutionMode::Sequential`] rows run in order on the calling
//! thread. In [`ExecutionMode::Parallel`] the rows are cut into contiguous
//! ranges, one per worker of a fixed-size rayon pool.
//!
//! # Design
//!
//! ```text
//! level k (read-only, shared)
//!        │
//!        ├──► worker 0 ──► rows [0, n)      ┐
//!        ├──► worker 1 ──► rows [n, 2n)     │ disjoint &mut slices
//!        └──► worker 2 ──► rows [2n, h)     ┘
//!                                  │
//!                         barrier (install returns)
//!                                  │
//!                                  ▼
//!                              level k+1
//! ```
//!
//! Each row is computed by the same closure with the same inputs whichever
//! worker runs it, so both modes produce bit-identical levels. No locks are
//! needed: the source level is only borrowed immutably and every worker owns
//! its own output rows.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;
use tracing::debug;

use crate::buffer::ImageBuffer;

/// How rows of a level are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    /// One row at a time on the calling thread.
    Sequential,
    /// Contiguous row ranges across a fixed worker pool.
    #[default]
    Parallel,
}

impl ExecutionMode {
    /// Short lowercase name used in logs and config files.
    pub fn name(self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExecutionMode {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "single" | "st" => Ok(ExecutionMode::Sequential),
            "parallel" | "multi" | "mt" => Ok(ExecutionMode::Parallel),
            _ => Err(SchedulerError::UnknownMode(s.to_string())),
        }
    }
}

/// Errors raised while setting up a scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The worker pool could not be created.
    #[error("failed to build worker pool with {threads} threads: {source}")]
    PoolCreation {
        threads: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },

    /// The execution mode name is not recognized.
    #[error("unknown execution mode '{0}' (expected sequential or parallel)")]
    UnknownMode(String),
}

/// Number of workers to use when none is configured.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Executes the per-row work of one level.
#[derive(Debug)]
pub struct TaskScheduler {
    mode: ExecutionMode,
    workers: usize,
    pool: Option<ThreadPool>,
}

impl TaskScheduler {
    /// A scheduler that runs every row on the calling thread.
    pub fn sequential() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            workers: 1,
            pool: None,
        }
    }

    /// A scheduler backed by a fixed pool of `threads` workers.
    ///
    /// `threads == 0` sizes the pool to the available hardware concurrency.
    pub fn parallel(threads: usize) -> Result<Self, SchedulerError> {
        let workers = if threads == 0 {
            available_workers()
        } else {
            threads
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("mipchain-worker-{}", i))
            .build()
            .map_err(|source| SchedulerError::PoolCreation {
                threads: workers,
                source,
            })?;

        debug!(workers, "Worker pool created");

        Ok(Self {
            mode: ExecutionMode::Parallel,
            workers,
            pool: Some(pool),
        })
    }

    /// Build a scheduler for `mode`; `threads` only applies to parallel mode.
    pub fn from_mode(mode: ExecutionMode, threads: usize) -> Result<Self, SchedulerError> {
        match mode {
            ExecutionMode::Sequential => Ok(Self::sequential()),
            ExecutionMode::Parallel => Self::parallel(threads),
        }
    }

    /// The execution mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Number of workers (1 for sequential).
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `f(y, row)` for every row of `dst`.
    ///
    /// Returns only after every row has been written.
    pub fn for_each_row<F>(&self, dst: &mut ImageBuffer, f: F)
    where
        F: Fn(usize, &mut [f32]) + Sync,
    {
        let pitch = dst.pitch();
        let height = dst.height();
        if pitch == 0 || height == 0 {
            return;
        }

        match &self.pool {
            None => {
                for (y, row) in dst.pixels_mut().chunks_exact_mut(pitch).enumerate() {
                    f(y, row);
                }
            }
            Some(pool) => {
                let rows_per_worker = height.div_ceil(self.workers).max(1);
                let f = &f;
                pool.install(|| {
                    dst.pixels_mut()
                        .par_chunks_mut(pitch * rows_per_worker)
                        .enumerate()
                        .for_each(|(range, rows)| {
                            let first_row = range * rows_per_worker;
                            for (i, row) in rows.chunks_exact_mut(pitch).enumerate() {
                                f(first_row + i, row);
                            }
                        });
                });
            }
        }
    }
}
