//! Per-call conversion options.

use serde::{Deserialize, Serialize};

use crate::encode::DEFAULT_QUALITY;
use crate::format::OutputFormat;

/// What to convert to, as chosen in the UI.
///
/// Deserializes from `{ "format": "image/avif", "quality": 0.8 }`; either
/// field may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Target encoding (default WEBP).
    pub format: OutputFormat,
    /// Quality factor in `[0.0, 1.0]` (default 0.92).
    pub quality: f32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ConvertOptions {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }
}
