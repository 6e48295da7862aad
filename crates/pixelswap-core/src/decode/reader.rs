//! Source image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;
use tracing::debug;

use super::{DecodeError, DecodedImage};

/// Decode any supported image container from bytes into an upright RGBA raster.
///
/// The container is sniffed from the bytes; the caller's declared media
/// type plays no part. EXIF orientation is applied so that the raster's
/// dimensions match what a browser reports as the natural size.
///
/// # Errors
///
/// Returns `DecodeError::EmptySource` for zero-length input,
/// `DecodeError::InvalidFormat` when no decoder recognizes the bytes, and
/// `DecodeError::CorruptedFile` when a recognized container fails to decode.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    let img = orientation.apply(img);

    let decoded = DecodedImage::from_rgba_image(img.into_rgba8());
    debug!(
        width = decoded.width,
        height = decoded.height,
        ?orientation,
        "decoded source image"
    );
    Ok(decoded)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptySource);
    }

    #[cfg(feature = "avif")]
    if crate::encode::sniff_format(bytes) == Some(crate::format::OutputFormat::Avif) {
        let decoded = super::avif::decode_avif(bytes)?;
        let img = image::RgbaImage::from_raw(decoded.width, decoded.height, decoded.pixels)
            .ok_or_else(|| DecodeError::CorruptedFile("AVIF pixel buffer size".to_string()))?;
        return Ok(DynamicImage::ImageRgba8(img));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode()?;
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::CorruptedFile(
            "decoded image has zero area".to_string(),
        ));
    }
    Ok(img)
}

/// EXIF orientation tag values 1-8. Anything else reads as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    /// Mirror across the top-left to bottom-right diagonal.
    Transpose,
    Rotate90CW,
    /// Mirror across the top-right to bottom-left diagonal.
    Transverse,
    Rotate270CW,
}

impl Orientation {
    fn from_exif(value: u32) -> Self {
        match value {
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90CW,
            7 => Self::Transverse,
            8 => Self::Rotate270CW,
            _ => Self::Normal,
        }
    }

    /// Turn a stored raster upright.
    fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => img,
            Self::FlipHorizontal => img.fliph(),
            Self::Rotate180 => img.rotate180(),
            Self::FlipVertical => img.flipv(),
            Self::Transpose => img.rotate90().fliph(),
            Self::Rotate90CW => img.rotate90(),
            Self::Transverse => img.rotate270().fliph(),
            Self::Rotate270CW => img.rotate270(),
        }
    }
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from_exif)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}
