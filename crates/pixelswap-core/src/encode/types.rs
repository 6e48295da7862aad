//! Error type and quality mapping shared by the encoders.

use thiserror::Error;

use crate::format::OutputFormat;

/// Quality used when the caller does not choose one.
pub const DEFAULT_QUALITY: f32 = 0.92;

/// Errors that can occur while producing encoded output.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the surface dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the surface
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },

    /// The codec finished without writing anything
    #[error("{0} encoder produced no output")]
    EmptyOutput(OutputFormat),

    /// The codec is not compiled into this build
    #[error("{0} encoding is not supported in this build")]
    Unsupported(OutputFormat),

    /// A transient handle to the output could not be created
    #[error("Could not create a handle for the encoded output: {0}")]
    HandleUnavailable(String),
}

impl EncodeError {
    pub(crate) fn failed(format: OutputFormat, err: impl std::fmt::Display) -> Self {
        EncodeError::EncodingFailed {
            format,
            message: err.to_string(),
        }
    }
}

/// Map a quality factor in `[0.0, 1.0]` to the 1-100 scale the codecs use.
///
/// Values outside the range are clamped. Non-finite values fall back to
/// [`DEFAULT_QUALITY`].
pub fn quality_percent(quality: f32) -> u8 {
    let q = if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        DEFAULT_QUALITY
    };
    ((q * 100.0).round() as u8).max(1)
}
