//! Output format catalog.
//!
//! The four encodings a conversion can target, with the MIME type, file
//! extension and picker label that belong to each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a MIME string names none of the supported outputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized output format: {0}")]
pub struct UnknownFormat(pub String);

/// Target encoding for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Baseline JPEG. No alpha channel.
    #[serde(rename = "image/jpeg")]
    Jpeg,
    /// Lossless PNG with alpha.
    #[serde(rename = "image/png")]
    Png,
    /// WebP container.
    #[default]
    #[serde(rename = "image/webp")]
    WebP,
    /// AVIF (AV1 still image).
    #[serde(rename = "image/avif")]
    Avif,
}

impl OutputFormat {
    /// All formats in picker order.
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::WebP,
        OutputFormat::Avif,
    ];

    /// MIME type, e.g. `image/jpeg`.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Avif => "image/avif",
        }
    }

    /// Canonical file extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => ".jpg",
            OutputFormat::Png => ".png",
            OutputFormat::WebP => ".webp",
            OutputFormat::Avif => ".avif",
        }
    }

    /// Short label shown in the format picker.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WEBP",
            OutputFormat::Avif => "AVIF",
        }
    }

    /// One-line description shown under the label.
    pub fn description(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "Best for photos",
            OutputFormat::Png => "Lossless with transparency",
            OutputFormat::WebP => "Modern web format",
            OutputFormat::Avif => "Next-gen compression",
        }
    }

    /// Whether the encoder honors the quality factor. Only PNG ignores it.
    pub fn uses_quality(self) -> bool {
        !matches!(self, OutputFormat::Png)
    }

    /// Whether the output container can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    /// Parse a MIME type. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.mime_type().eq_ignore_ascii_case(mime))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mime(s).ok_or_else(|| UnknownFormat(s.to_string()))
    }
}
