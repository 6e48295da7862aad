//! Decode errors and the decoded raster.

use thiserror::Error;

/// Why a source file could not be turned into a raster.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Source file is empty")]
    EmptySource,

    /// No compiled-in decoder recognizes the bytes.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The container was recognized but its payload is damaged or truncated.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Rejected by the decoder's allocation limits.
    #[error("Out of memory during decoding")]
    OutOfMemory,

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(_) => Self::InvalidFormat,
            image::ImageError::Limits(_) => Self::OutOfMemory,
            image::ImageError::IoError(e) => Self::IoError(e.to_string()),
            other => Self::CorruptedFile(other.to_string()),
        }
    }
}

/// Upright straight-alpha RGBA8 raster at the source's natural size.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, 4 bytes per pixel; `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// RGBA at (x, y); `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(start..start + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
