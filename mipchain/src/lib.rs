//! mipchain - color-space-aware mip chain generation
//!
//! This library produces the full chain of half-resolution levels for a
//! texture, filtering in linear light and applying the policy that matches
//! what the texture holds: sRGB color, linear data, or normal vectors.
//!
//! # Example
//!
//! ```
//! use mipchain::buffer::ImageBuffer;
//! use mipchain::color::SourceType;
//! use mipchain::filter::FilterSpec;
//! use mipchain::mip::generate_mip_chain;
//!
//! let base = ImageBuffer::filled(8, 4, [1.0, 0.0, 0.0]);
//! let chain = generate_mip_chain(base, SourceType::Srgb, FilterSpec::kaiser()).unwrap();
//!
//! assert_eq!(chain.len(), 4);
//! assert_eq!(chain.last().unwrap().dimensions(), (1, 1));
//! ```

pub mod buffer;
pub mod codec;
pub mod color;
pub mod config;
pub mod filter;
pub mod logging;
pub mod mip;
pub mod pipeline;
pub mod scheduler;

pub use buffer::ImageBuffer;
pub use color::SourceType;
pub use config::MipConfig;
pub use filter::FilterSpec;
pub use mip::{generate_mip_chain, MipError, MipGenerator};
pub use scheduler::ExecutionMode;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
