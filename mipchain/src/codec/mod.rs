//! Image file decoding and encoding.
//!
//! The generator never touches files. An [`ImageCodec`] sits on either side
//! of it: `load` produces an [`ImageBuffer`](crate::buffer::ImageBuffer) of
//! `[0, 1]` floats exactly as stored in the file, and `save` writes a buffer
//! that has already been prepared for output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │     MipPipeline     │
//! │                     │
//! │  Arc<dyn ImageCodec>│
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    ImageCodec       │ (trait)
//! └──────────┬──────────┘
//!            │
//!       ┌────┴────┐
//!       ▼         ▼
//! ┌──────────┐ ┌──────────┐
//! │ PngCodec │ │   Test   │
//! │          │ │  codecs  │
//! └──────────┘ └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use mipchain::codec::{ImageCodec, PngCodec};
//!
//! let codec: Arc<dyn ImageCodec> = Arc::new(PngCodec::new());
//! let image = codec.load(Path::new("albedo.png")).unwrap();
//! println!("{}×{} via {}", image.width(), image.height(), codec.name());
//! ```

mod error;
mod png;

pub use error::CodecError;
pub use png::PngCodec;

use std::path::Path;

use crate::buffer::ImageBuffer;

/// Reads and writes RGB images as `[0, 1]` float buffers.
pub trait ImageCodec: Send + Sync {
    /// Decode the file at `path` into three-channel floats in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// [`CodecError::Load`] for unreadable, corrupt or unsupported input.
    fn load(&self, path: &Path) -> Result<ImageBuffer, CodecError>;

    /// Encode `image` to `path`. Values outside `[0, 1]` are clamped.
    ///
    /// # Errors
    ///
    /// [`CodecError::Save`] on encode or write failure.
    fn save(&self, path: &Path, image: &ImageBuffer) -> Result<(), CodecError>;

    /// File extension written by `save`, without the dot.
    fn extension(&self) -> &str;

    /// Human readable name.
    fn name(&self) -> &str;
}
