//! Run configuration.
//!
//! [`MipConfig`] is the single value that decides how a chain is produced:
//! source type, filter, and scheduling. It is built explicitly and passed to
//! [`MipGenerator::new`](crate::mip::MipGenerator::new); nothing is read from
//! global state.
//!
//! [`ConfigFile`] holds user defaults loaded from an INI file. Command line
//! arguments are layered over it by the CLI.

mod file;

pub use file::{config_file_path, ConfigError, ConfigFile, FilterSection, LoggingSection, SchedulerSection};

use crate::color::SourceType;
use crate::filter::FilterSpec;
use crate::scheduler::ExecutionMode;

/// Everything the generator needs to know about a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MipConfig {
    /// Color space and renormalization policy.
    pub source_type: SourceType,

    /// Resampling filter.
    pub filter: FilterSpec,

    /// Sequential or parallel row execution.
    pub execution: ExecutionMode,

    /// Worker count for parallel execution; 0 means one per available core.
    pub threads: usize,
}

impl MipConfig {
    /// Parallel configuration with automatic worker count.
    pub fn new(source_type: SourceType, filter: FilterSpec) -> Self {
        Self {
            source_type,
            filter,
            execution: ExecutionMode::Parallel,
            threads: 0,
        }
    }

    /// Set the source type.
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    /// Set the filter.
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    /// Set the execution mode.
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Set the worker count (0 = automatic).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_srgb_box_parallel() {
        let config = MipConfig::default();
        assert_eq!(config.source_type, SourceType::Srgb);
        assert_eq!(config.filter, FilterSpec::Box);
        assert_eq!(config.execution, ExecutionMode::Parallel);
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn test_builder_chain() {
        let config = MipConfig::new(SourceType::Data, FilterSpec::Box)
            .with_source_type(SourceType::NormalMap)
            .with_filter(FilterSpec::kaiser())
            .with_execution(ExecutionMode::Sequential)
            .with_threads(3);
        assert_eq!(config.source_type, SourceType::NormalMap);
        assert_eq!(config.filter, FilterSpec::kaiser());
        assert_eq!(config.execution, ExecutionMode::Sequential);
        assert_eq!(config.threads, 3);
    }
}
