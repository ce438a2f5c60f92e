//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use mipchain::color::SourceType;
use mipchain::config::ConfigFile;
use mipchain::filter::FilterSpec;
use mipchain::scheduler::ExecutionMode;

use crate::error::CliError;

/// Filter selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FilterKind {
    /// 2×2 average (fast, slightly soft)
    Box,
    /// Kaiser-windowed sinc (sharper, slower)
    Kaiser,
}

/// Resolve the source type from the -N / -D flags.
///
/// Both flags override each other, so at most one is set here.
pub fn resolve_source_type(normal_map: bool, data: bool) -> SourceType {
    if normal_map {
        SourceType::NormalMap
    } else if data {
        SourceType::Data
    } else {
        SourceType::Srgb
    }
}

/// Resolve the filter from CLI args and config.
pub fn resolve_filter(
    cli_kind: Option<FilterKind>,
    cli_alpha: Option<f32>,
    cli_radius: Option<f32>,
    config: &ConfigFile,
) -> Result<FilterSpec, CliError> {
    // CLI takes precedence, then config
    let kaiser = match cli_kind {
        Some(FilterKind::Kaiser) => true,
        Some(FilterKind::Box) => false,
        None => matches!(config.filter.spec, FilterSpec::Kaiser { .. }),
    };

    if !kaiser {
        if cli_alpha.is_some() || cli_radius.is_some() {
            return Err(CliError::Config(
                "--kaiser-alpha and --kaiser-radius require the kaiser filter. \
                 Use --filter kaiser or set kind = kaiser in config.ini"
                    .to_string(),
            ));
        }
        return Ok(FilterSpec::Box);
    }

    let spec = FilterSpec::Kaiser {
        alpha: cli_alpha.unwrap_or(config.filter.kaiser_alpha),
        support_radius: cli_radius.unwrap_or(config.filter.kaiser_radius),
    };
    spec.validate().map_err(|e| CliError::Config(e.to_string()))?;
    Ok(spec)
}

/// Resolve execution mode and worker count from CLI args and config.
pub fn resolve_execution(
    single_thread: bool,
    cli_threads: Option<usize>,
    config: &ConfigFile,
) -> (ExecutionMode, usize) {
    let mode = if single_thread {
        ExecutionMode::Sequential
    } else {
        config.scheduler.mode
    };
    let threads = cli_threads.unwrap_or(config.scheduler.threads);
    (mode, threads)
}
