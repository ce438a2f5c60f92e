//! File-to-files mip generation.
//!
//! [`MipPipeline`] wires a codec around a generator:
//!
//! 1. Load the source through the codec (I/O happens here only)
//! 2. Generate the full chain in linear space
//! 3. Encode each level for output and save it as `<stem>_mip<level>.<ext>`
//!
//! A chain is only written once every level has been computed. Saving stops
//! at the first failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::codec::{CodecError, ImageCodec};
use crate::mip::{MipError, MipGenerator};

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source path has no usable file name.
    #[error("source path {} has no file name", .0.display())]
    InvalidSourcePath(PathBuf),

    /// Loading or saving failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Mip generation failed.
    #[error(transparent)]
    Mip(#[from] MipError),
}

/// One written level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelOutput {
    pub level: usize,
    pub width: usize,
    pub height: usize,
    pub path: PathBuf,
}

/// File name for `level` of a source named `stem`.
pub fn level_file_name(stem: &str, level: usize, extension: &str) -> String {
    format!("{}_mip{}.{}", stem, level, extension)
}

/// Path for `level` of `source`, in `output_dir` or next to the source.
pub fn level_path(
    source: &Path,
    output_dir: Option<&Path>,
    level: usize,
    extension: &str,
) -> Result<PathBuf, PipelineError> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PipelineError::InvalidSourcePath(source.to_path_buf()))?;
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(level_file_name(&stem, level, extension)))
}

/// Load → generate → save for single source files.
pub struct MipPipeline {
    codec: Arc<dyn ImageCodec>,
    generator: MipGenerator,
    output_dir: Option<PathBuf>,
}

impl MipPipeline {
    /// Create a pipeline writing next to each source file.
    pub fn new(codec: Arc<dyn ImageCodec>, generator: MipGenerator) -> Self {
        Self {
            codec,
            generator,
            output_dir: None,
        }
    }

    /// Write levels into `dir` instead of the source's directory.
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    /// The generator in use.
    pub fn generator(&self) -> &MipGenerator {
        &self.generator
    }

    /// Process one source file and return the written levels in order.
    pub fn run(&self, source: &Path) -> Result<Vec<LevelOutput>, PipelineError> {
        let extension = self.codec.extension().to_string();
        // Validate naming before doing any work
        level_path(source, self.output_dir.as_deref(), 0, &extension)?;

        let base = self.codec.load(source)?;
        info!(
            path = %source.display(),
            width = base.width(),
            height = base.height(),
            codec = self.codec.name(),
            "Source loaded"
        );

        let chain = self.generator.generate(base)?;
        let source_type = self.generator.config().source_type;

        let mut written = Vec::with_capacity(chain.len());
        for (level, image) in chain.iter().enumerate() {
            let path = level_path(source, self.output_dir.as_deref(), level, &extension)?;
            let encoded = source_type.to_output(image);
            self.codec.save(&path, &encoded)?;
            debug!(level, path = %path.display(), "Level saved");
            written.push(LevelOutput {
                level,
                width: image.width(),
                height: image.height(),
                path,
            });
        }

        info!(levels = written.len(), "Mip chain written");
        Ok(written)
    }
}
