//! Error types for image codec operations.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while reading or writing image files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The file could not be read or decoded.
    Load { path: PathBuf, reason: String },
    /// The image could not be encoded or written.
    Save { path: PathBuf, reason: String },
}

impl CodecError {
    /// Path of the file involved.
    pub fn path(&self) -> &PathBuf {
        match self {
            CodecError::Load { path, .. } | CodecError::Save { path, .. } => path,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Load { path, reason } => {
                write!(f, "Failed to load {}: {}", path.display(), reason)
            }
            CodecError::Save { path, reason } => {
                write!(f, "Failed to save {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for CodecError {}
