//! JPEG encoding.
//!
//! JPEG carries no alpha, so the surface's alpha channel is dropped. The
//! conversion pipeline composites onto white first, which makes the drop
//! lossless for every pixel.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::EncodeError;
use crate::format::OutputFormat;
use crate::surface::Surface;

/// Encode a surface to JPEG bytes.
///
/// # Arguments
///
/// * `surface` - The surface to encode; alpha is ignored
/// * `quality` - JPEG quality (1-100, clamped)
///
/// # Quality Guidelines
///
/// * 90-100: High quality (the converter default is 92)
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(surface: &Surface, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let quality = quality.clamp(1, 100);
    let rgb = surface.to_rgb_pixels();

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            &rgb,
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::failed(OutputFormat::Jpeg, e))?;

    Ok(buffer.into_inner())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Encoding always produces framed JPEG for any valid surface.
        #[test]
        fn prop_valid_surface_produces_valid_jpeg(
            width in 1u32..=40,
            height in 1u32..=40,
            quality in 0u8..=255,
        ) {
            let surface = Surface::new(width, height).unwrap();
            let jpeg = encode_jpeg(&surface, quality).unwrap();

            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            let len = jpeg.len();
            prop_assert!(len >= 4);
            prop_assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
        }

        /// Property: Same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            width in 1u32..=20,
            height in 1u32..=20,
            quality in 1u8..=100,
        ) {
            let surface = Surface::from_raw(
                width,
                height,
                [100, 100, 100, 255].repeat((width * height) as usize),
            )
            .unwrap();

            prop_assert_eq!(
                encode_jpeg(&surface, quality).unwrap(),
                encode_jpeg(&surface, quality).unwrap()
            );
        }
    }
}
