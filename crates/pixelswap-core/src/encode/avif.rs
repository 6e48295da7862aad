//! AVIF encoding through rav1e (the `avif` cargo feature).

use image::codecs::avif::AvifEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::EncodeError;
use crate::format::OutputFormat;
use crate::surface::Surface;

/// rav1e speed preset (1 = slowest/best, 10 = fastest).
pub const AVIF_SPEED: u8 = 6;

/// Encode a surface to AVIF bytes.
///
/// `quality` is on the 1-100 scale and clamped.
pub fn encode_avif(surface: &Surface, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    AvifEncoder::new_with_speed_quality(&mut buffer, AVIF_SPEED, quality)
        .write_image(
            surface.pixels(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::failed(OutputFormat::Avif, e))?;

    Ok(buffer.into_inner())
}
