//! Shared startup for CLI commands: config loading and logging.

use std::path::Path;

use mipchain::config::ConfigFile;
use mipchain::logging::{init_logging, verbosity_directive};
use tracing::{debug, info};

use crate::error::CliError;

/// Loaded configuration plus an initialized logger.
pub struct CliRunner {
    config: ConfigFile,
}

impl CliRunner {
    /// Load configuration (explicit path or default location) and install
    /// the log subscriber.
    pub fn new(config_path: Option<&Path>, verbose: u8) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        init_logging(&verbosity_directive(verbose, &config.logging.level))?;

        Ok(Self { config })
    }

    /// Log the startup banner for `command`.
    pub fn log_startup(&self, command: &str) {
        info!(version = mipchain::VERSION, command, "mipchain starting");
        debug!(config = ?self.config, "Effective configuration");
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }
}
