//! CLI error type.

use std::fmt;
use std::process::ExitCode;

use mipchain::config::ConfigError;
use mipchain::logging::LoggingError;
use mipchain::mip::MipError;
use mipchain::pipeline::PipelineError;

/// Errors surfaced to the user by the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or conflicting settings.
    Config(String),

    /// The configuration file could not be loaded.
    ConfigFile(ConfigError),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// The generator could not be created.
    Setup(MipError),

    /// Loading, generating or saving failed.
    Pipeline(PipelineError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Setup(e) => write!(f, "Failed to set up mip generation: {}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Setup(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<MipError> for CliError {
    fn from(e: MipError) -> Self {
        CliError::Setup(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
