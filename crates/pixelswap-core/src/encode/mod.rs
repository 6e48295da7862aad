//! Surface encoding for Pixelswap.
//!
//! This module provides functionality for:
//! - Encoding a drawing surface to JPEG, PNG, WebP or AVIF
//! - Mapping the caller's `[0.0, 1.0]` quality factor onto codec settings
//! - Recognizing encoded output by its magic bytes
//!
//! Quality reaches JPEG, WebP and AVIF. PNG is lossless and ignores it.
//!
//! # Examples
//!
//! ```ignore
//! use pixelswap_core::encode::encode_surface;
//! use pixelswap_core::{OutputFormat, Surface};
//!
//! let surface = Surface::new(100, 100).unwrap();
//! let bytes = encode_surface(&surface, OutputFormat::Png, 0.92).unwrap();
//! ```

#[cfg(feature = "avif")]
mod avif;
mod jpeg;
mod png;
mod sniff;
mod types;
mod webp;

#[cfg(feature = "avif")]
pub use avif::{encode_avif, AVIF_SPEED};
pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use sniff::sniff_format;
pub use types::{quality_percent, EncodeError, DEFAULT_QUALITY};
pub use webp::encode_webp;

use tracing::debug;

use crate::format::OutputFormat;
use crate::surface::Surface;

/// Encode `surface` to `format`.
///
/// # Errors
///
/// Returns `EncodeError::Unsupported` when the codec is not compiled in,
/// `EncodeError::EncodingFailed` when the codec rejects the surface, and
/// `EncodeError::EmptyOutput` when it writes nothing.
pub fn encode_surface(
    surface: &Surface,
    format: OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    let percent = quality_percent(quality);

    let bytes = match format {
        OutputFormat::Jpeg => encode_jpeg(surface, percent)?,
        OutputFormat::Png => encode_png(surface)?,
        OutputFormat::WebP => encode_webp(surface, percent)?,
        #[cfg(feature = "avif")]
        OutputFormat::Avif => encode_avif(surface, percent)?,
        #[cfg(not(feature = "avif"))]
        OutputFormat::Avif => return Err(EncodeError::Unsupported(format)),
    };

    if bytes.is_empty() {
        return Err(EncodeError::EmptyOutput(format));
    }

    debug!(
        %format,
        width = surface.width(),
        height = surface.height(),
        quality = percent,
        size = bytes.len(),
        "encoded surface"
    );
    Ok(bytes)
}
