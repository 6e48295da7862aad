//! Umbrella error for a conversion.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Which pipeline stage a conversion failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source never became a raster.
    Decode,
    /// The surface could not be serialized or handed out.
    Encode,
}

/// A failed conversion. Both variants are terminal: there is no partial
/// result and no fallback format.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Decode(_) => ErrorKind::Decode,
            ConvertError::Encode(_) => ErrorKind::Encode,
        }
    }
}
