//! INI configuration file.
//!
//! ```ini
//! [filter]
//! ; box | kaiser
//! kind = kaiser
//! kaiser_alpha = 4.0
//! kaiser_radius = 3.0
//!
//! [scheduler]
//! ; parallel | sequential
//! mode = parallel
//! ; 0 = one worker per core
//! threads = 0
//!
//! [logging]
//! level = info
//! ```
//!
//! Every key is optional. Missing keys keep their defaults, and a missing
//! file at the default location is not an error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::filter::{FilterSpec, DEFAULT_KAISER_ALPHA, DEFAULT_KAISER_RADIUS};
use crate::scheduler::ExecutionMode;

/// Default log directive when neither the file nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("failed to parse config file: {0}")]
    Parse(String),

    /// A key has a value that cannot be used.
    #[error("invalid value '{value}' for {section}.{key}: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// `[filter]` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSection {
    /// Selected filter, with the Kaiser parameters below applied.
    pub spec: FilterSpec,
    /// Kaiser alpha, used whenever Kaiser is selected.
    pub kaiser_alpha: f32,
    /// Kaiser support radius, used whenever Kaiser is selected.
    pub kaiser_radius: f32,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            spec: FilterSpec::Box,
            kaiser_alpha: DEFAULT_KAISER_ALPHA,
            kaiser_radius: DEFAULT_KAISER_RADIUS,
        }
    }
}

impl FilterSection {
    /// Kaiser spec using this section's parameters.
    pub fn kaiser(&self) -> FilterSpec {
        FilterSpec::Kaiser {
            alpha: self.kaiser_alpha,
            support_radius: self.kaiser_radius,
        }
    }
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerSection {
    pub mode: ExecutionMode,
    pub threads: usize,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSection {
    /// `tracing` filter directive, e.g. `info` or `mipchain=debug`.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// User defaults loaded from `config.ini`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub filter: FilterSection,
    pub scheduler: SchedulerSection,
    pub logging: LoggingSection,
}

/// Default location of the configuration file.
///
/// `<config dir>/mipchain/config.ini`, e.g. `~/.config/mipchain/config.ini`
/// on Linux. `None` when the platform has no config directory.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mipchain").join("config.ini"))
}

impl ConfigFile {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ini_str(&contents)?;
        debug!(path = %path.display(), "Config file loaded");
        Ok(config)
    }

    /// Parse INI text.
    pub fn from_ini_str(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        if let Some(alpha) = parse_value::<f32>(&ini, "filter", "kaiser_alpha")? {
            config.filter.kaiser_alpha = alpha;
        }
        if let Some(radius) = parse_value::<f32>(&ini, "filter", "kaiser_radius")? {
            config.filter.kaiser_radius = radius;
        }
        if let Some(kind) = parse_value::<FilterSpec>(&ini, "filter", "kind")? {
            config.filter.spec = kind;
        }
        if let FilterSpec::Kaiser { .. } = config.filter.spec {
            let spec = config.filter.kaiser();
            spec.validate().map_err(|e| ConfigError::InvalidValue {
                section: "filter",
                key: "kaiser_alpha/kaiser_radius",
                value: spec.to_string(),
                reason: e.to_string(),
            })?;
            config.filter.spec = spec;
        }

        if let Some(mode) = parse_value::<ExecutionMode>(&ini, "scheduler", "mode")? {
            config.scheduler.mode = mode;
        }
        if let Some(threads) = parse_value::<usize>(&ini, "scheduler", "threads")? {
            config.scheduler.threads = threads;
        }

        if let Some(level) = ini.get_from(Some("logging"), "level") {
            let level = level.trim();
            if !level.is_empty() {
                config.logging.level = level.to_string();
            }
        }

        Ok(config)
    }
}

/// Parse `section.key` if present.
fn parse_value<T>(ini: &Ini, section: &'static str, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(raw) = ini.get_from(Some(section), key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            section,
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = ConfigFile::from_ini_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.filter.spec, FilterSpec::Box);
        assert_eq!(config.scheduler.mode, ExecutionMode::Parallel);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_full_file() {
        let config = ConfigFile::from_ini_str(
            "[filter]\nkind = kaiser\nkaiser_alpha = 6\nkaiser_radius = 2.5\n\
             [scheduler]\nmode = sequential\nthreads = 4\n\
             [logging]\nlevel = mipchain=debug\n",
        )
        .unwrap();
        assert_eq!(
            config.filter.spec,
            FilterSpec::Kaiser {
                alpha: 6.0,
                support_radius: 2.5
            }
        );
        assert_eq!(config.scheduler.mode, ExecutionMode::Sequential);
        assert_eq!(config.scheduler.threads, 4);
        assert_eq!(config.logging.level, "mipchain=debug");
    }

    #[test]
    fn test_kaiser_parameters_kept_when_box_selected() {
        let config =
            ConfigFile::from_ini_str("[filter]\nkind = box\nkaiser_alpha = 8\n").unwrap();
        assert_eq!(config.filter.spec, FilterSpec::Box);
        assert_eq!(config.filter.kaiser().to_string(), "kaiser(alpha=8, radius=3)");
    }

    #[test]
    fn test_invalid_threads() {
        let err = ConfigFile::from_ini_str("[scheduler]\nthreads = many\n").unwrap_err();
        match err {
            ConfigError::InvalidValue {
                section,
                key,
                value,
                ..
            } => {
                assert_eq!(section, "scheduler");
                assert_eq!(key, "threads");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_kaiser_radius() {
        let err =
            ConfigFile::from_ini_str("[filter]\nkind = kaiser\nkaiser_radius = -1\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { section: "filter", .. }));
    }

    #[test]
    fn test_oversized_kaiser_radius() {
        let err = ConfigFile::from_ini_str("[filter]\nkind = kaiser\nkaiser_radius = 1e20\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { section: "filter", .. }));
        assert!(err.to_string().contains("support_radius"));
    }

    #[test]
    fn test_unknown_filter_kind() {
        let err = ConfigFile::from_ini_str("[filter]\nkind = mitchell\n").unwrap_err();
        assert!(err.to_string().contains("mitchell"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scheduler]\nmode = sequential").unwrap();
        let config = ConfigFile::load_from(file.path()).unwrap();
        assert_eq!(config.scheduler.mode, ExecutionMode::Sequential);
    }

    #[test]
    fn test_load_from_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load_from(&dir.path().join("nope.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("nope.ini"));
    }

    #[test]
    fn test_default_path_ends_with_config_ini() {
        if let Some(path) = config_file_path() {
            assert!(path.ends_with("mipchain/config.ini"));
        }
    }
}
