//! Logging setup.
//!
//! Library code only emits `tracing` events. Binaries call [`init_logging`]
//! once to install a formatting subscriber that writes to stderr, leaving
//! stdout for command output.
//!
//! `RUST_LOG` always wins over the directive passed in, so
//! `RUST_LOG=mipchain=trace` works regardless of configuration.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The directive could not be parsed.
    #[error("invalid log directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },

    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Directive for a `-v` count, starting from `configured`.
///
/// 0 keeps the configured level, 1 raises to `debug`, 2 or more to `trace`.
pub fn verbosity_directive(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Build the filter: `RUST_LOG` if set and valid, else `directive`.
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidDirective {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global stderr subscriber.
pub fn init_logging(directive: &str) -> Result<(), LoggingError> {
    let filter = build_filter(directive)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directive() {
        assert_eq!(verbosity_directive(0, "warn"), "warn");
        assert_eq!(verbosity_directive(1, "warn"), "debug");
        assert_eq!(verbosity_directive(2, "warn"), "trace");
        assert_eq!(verbosity_directive(9, "info"), "trace");
    }

    #[test]
    fn test_build_filter_accepts_module_directives() {
        assert!(build_filter("mipchain=debug,info").is_ok());
    }
}
