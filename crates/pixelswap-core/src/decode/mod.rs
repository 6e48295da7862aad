//! Source decoding for Pixelswap.
//!
//! This module provides functionality for:
//! - Holding the user-selected file (`SourceFile`)
//! - Decoding any compiled-in container (JPEG, PNG, WebP, GIF, BMP, TIFF,
//!   and AVIF with the `avif` feature) into an RGBA raster
//! - Applying EXIF orientation so the raster is upright
//!
//! The container is always sniffed from the bytes. A declared media type
//! that disagrees with the content is ignored.

#[cfg(feature = "avif")]
mod avif;
#[cfg(test)]
pub(crate) mod fixtures;
mod reader;
mod source;
mod types;

pub use reader::decode_image;
pub use source::SourceFile;
pub(crate) use source::file_name_of;
pub use types::{DecodeError, DecodedImage};
