//! WebP encoding.
//!
//! The pure Rust encoder in the `image` crate only writes VP8L (lossless)
//! bitstreams. Below quality 100 the color channels are first reduced to a
//! coarser palette, which VP8L compresses far better, so quality trades
//! detail for size as it does in a lossy encoder. Alpha is never touched.

use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use std::borrow::Cow;
use std::io::Cursor;

use super::EncodeError;
use crate::format::OutputFormat;
use crate::surface::Surface;

/// Encode a surface to RGBA WebP bytes.
///
/// # Arguments
///
/// * `surface` - The surface to encode
/// * `quality` - 1-100; 100 keeps every pixel exactly
pub fn encode_webp(surface: &Surface, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let pixels = if quality >= 100 {
        Cow::Borrowed(surface.pixels())
    } else {
        let mut owned = surface.pixels().to_vec();
        quantize_rgb(&mut owned, quality);
        Cow::Owned(owned)
    };

    let mut buffer = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buffer)
        .encode(
            &pixels,
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::failed(OutputFormat::WebP, e))?;

    Ok(buffer.into_inner())
}

/// Snap each RGB channel to one of `levels_for(quality)` evenly spaced values.
fn quantize_rgb(rgba: &mut [u8], quality: u8) {
    let levels = levels_for(quality);
    if levels >= 256 {
        return;
    }
    let step = 255.0 / (levels - 1) as f32;
    for px in rgba.chunks_exact_mut(4) {
        for channel in &mut px[..3] {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Palette size per channel. Quadratic in quality: fine steps near the top
/// of the range, very coarse ones at the bottom.
fn levels_for(quality: u8) -> u16 {
    if quality >= 100 {
        return 256;
    }
    let q = f32::from(quality.max(1)) / 100.0;
    (2.0 + q * q * 254.0).round().clamp(2.0, 256.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic per-pixel noise, the worst case for VP8L.
    fn noisy(width: u32, height: u32) -> Surface {
        let mut state = 0x2545_f491_u32;
        let pixels = (0..width * height * 4)
            .map(|i| {
                if i % 4 == 3 {
                    return 255;
                }
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect();
        Surface::from_raw(width, height, pixels).unwrap()
    }

    #[test]
    fn test_encode_webp_container() {
        let webp = encode_webp(&Surface::new(3, 3).unwrap(), 92).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_full_quality_is_exact() {
        let surface = noisy(8, 8);
        let webp = encode_webp(&surface, 100).unwrap();

        let decoded = image::load_from_memory(&webp).unwrap().into_rgba8();
        assert_eq!(decoded.as_raw(), surface.pixels());
    }

    #[test]
    fn test_low_quality_is_smaller() {
        let surface = noisy(64, 64);
        let low = encode_webp(&surface, 10).unwrap();
        let high = encode_webp(&surface, 100).unwrap();
        assert!(
            low.len() < high.len(),
            "q10 = {} bytes, q100 = {} bytes",
            low.len(),
            high.len()
        );
    }

    #[test]
    fn test_encode_webp_preserves_alpha() {
        let pixels = vec![
            255, 0, 0, 255, //
            0, 0, 255, 0, //
        ];
        let surface = Surface::from_raw(2, 1, pixels).unwrap();
        let webp = encode_webp(&surface, 20).unwrap();

        let decoded = image::load_from_memory(&webp).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
    }

    #[test]
    fn test_levels_for_quality() {
        assert_eq!(levels_for(100), 256);
        assert_eq!(levels_for(1), 2);
        assert_eq!(levels_for(10), 5);
        assert!(levels_for(92) > levels_for(50));
    }

    #[test]
    fn test_quantize_keeps_extremes_and_alpha() {
        let mut px = vec![0, 255, 130, 77];
        quantize_rgb(&mut px, 1);
        assert_eq!(px, vec![0, 255, 255, 77]);
    }
}
