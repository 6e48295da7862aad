//! PNG encoding. Lossless; quality does not apply.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::EncodeError;
use crate::format::OutputFormat;
use crate::surface::Surface;

/// Encode a surface to RGBA PNG bytes.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            surface.pixels(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::failed(OutputFormat::Png, e))?;

    Ok(buffer.into_inner())
}
