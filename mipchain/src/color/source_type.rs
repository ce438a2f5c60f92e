//! Semantic type of a source texture.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{encode_in_place, linearize_in_place};
use crate::buffer::ImageBuffer;

/// What the pixels of a source texture mean.
///
/// Selects the color space and renormalization policy for the whole chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceType {
    /// Gamma encoded color; filtered in linear light.
    #[default]
    Srgb,
    /// Non-color data such as roughness; already linear.
    Data,
    /// Tangent-space normals; renormalized after every level.
    NormalMap,
}

impl SourceType {
    /// True when values must be linearized before filtering.
    pub fn is_gamma_encoded(self) -> bool {
        matches!(self, SourceType::Srgb)
    }

    /// True when each filtered level must be renormalized.
    pub fn requires_renormalization(self) -> bool {
        matches!(self, SourceType::NormalMap)
    }

    /// Short lowercase name used in logs and config files.
    pub fn name(self) -> &'static str {
        match self {
            SourceType::Srgb => "srgb",
            SourceType::Data => "data",
            SourceType::NormalMap => "normal",
        }
    }

    /// Bring freshly decoded codec values into the linear working space.
    pub fn linearize(self, image: &mut ImageBuffer) {
        if self.is_gamma_encoded() {
            linearize_in_place(image.pixels_mut());
        }
    }

    /// Produce the codec-facing copy of a linear level.
    ///
    /// The in-memory chain is left untouched; only the returned buffer is
    /// encoded.
    pub fn to_output(self, image: &ImageBuffer) -> ImageBuffer {
        let mut out = image.clone();
        if self.is_gamma_encoded() {
            encode_in_place(out.pixels_mut());
        }
        out
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized source type name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown source type '{0}' (expected srgb, data or normal)")]
pub struct ParseSourceTypeError(pub String);

impl FromStr for SourceType {
    type Err = ParseSourceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "srgb" | "color" | "colour" => Ok(SourceType::Srgb),
            "data" | "linear" => Ok(SourceType::Data),
            "normal" | "normalmap" | "normal-map" | "normal_map" => Ok(SourceType::NormalMap),
            _ => Err(ParseSourceTypeError(s.to_string())),
        }
    }
}
