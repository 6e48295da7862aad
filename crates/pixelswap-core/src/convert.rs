//! The conversion pipeline: decode, rasterize, encode, name.
//!
//! These functions are pure. Publishing the output behind a transient
//! handle is the job of [`ConversionService`](crate::ConversionService).

use crate::decode::{decode_image, DecodedImage, SourceFile};
use crate::encode::{encode_surface, EncodeError};
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::surface::rasterize;

/// Encoded output of one conversion, before a handle is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoded bytes in `format`'s container.
    pub bytes: Vec<u8>,
    /// Encoding of `bytes`.
    pub format: OutputFormat,
    /// Width of the encoded surface.
    pub width: u32,
    /// Height of the encoded surface.
    pub height: u32,
    /// Suggested download name.
    pub filename: String,
}

/// Convert a source file to `format` at `quality` (`0.0..=1.0`).
///
/// # Errors
///
/// Returns `ConvertError::Decode` when the bytes are not a decodable image
/// and `ConvertError::Encode` when the surface cannot be serialized.
pub fn convert_source(
    source: &SourceFile,
    format: OutputFormat,
    quality: f32,
) -> Result<EncodedImage, ConvertError> {
    let raster = decode_image(source.bytes())?;
    Ok(encode_raster(&raster, format, quality, source.name())?)
}

/// Rasterize and encode an already decoded image.
///
/// `original_name` only feeds the derived filename.
pub fn encode_raster(
    raster: &DecodedImage,
    format: OutputFormat,
    quality: f32,
    original_name: &str,
) -> Result<EncodedImage, EncodeError> {
    let surface = rasterize(raster, format)?;
    let bytes = encode_surface(&surface, format, quality)?;

    Ok(EncodedImage {
        bytes,
        format,
        width: surface.width(),
        height: surface.height(),
        filename: derive_name(original_name, format),
    })
}

/// Build the download name for a converted file.
///
/// Everything from the last `.` onward is dropped (nothing when there is no
/// `.`), then the format's extension is appended.
///
/// ```ignore
/// assert_eq!(derive_name("photo.tiff", OutputFormat::Png), "photo.png");
/// assert_eq!(derive_name("a.b.c", OutputFormat::Jpeg), "a.b.jpg");
/// ```
pub fn derive_name(original: &str, format: OutputFormat) -> String {
    let stem = original
        .rfind('.')
        .map_or(original, |dot| &original[..dot]);
    format!("{stem}{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeError;
    use crate::encode::sniff_format;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_source(name: &str, img: &RgbaImage) -> SourceFile {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        SourceFile::new(name, buf.into_inner()).with_media_type("image/png")
    }

    /// Left half fully transparent, right half opaque red.
    fn half_transparent(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([255, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_derive_name_examples() {
        assert_eq!(derive_name("photo.tiff", OutputFormat::Png), "photo.png");
        assert_eq!(derive_name("noext", OutputFormat::WebP), "noext.webp");
        assert_eq!(derive_name("a.b.c", OutputFormat::Jpeg), "a.b.jpg");
        assert_eq!(derive_name("shot.PNG", OutputFormat::Avif), "shot.avif");
    }

    #[test]
    fn test_derive_name_edge_cases() {
        assert_eq!(derive_name("", OutputFormat::Png), ".png");
        assert_eq!(derive_name("trailing.", OutputFormat::Png), "trailing.png");
        assert_eq!(derive_name(".hidden", OutputFormat::Jpeg), ".jpg");
        assert_eq!(derive_name("café.gif", OutputFormat::WebP), "café.webp");
    }

    #[test]
    fn test_convert_png_to_jpeg_whitens_transparency() {
        let source = png_source("sticker.png", &half_transparent(32, 16));
        let out = convert_source(&source, OutputFormat::Jpeg, 0.92).unwrap();

        assert_eq!(out.filename, "sticker.jpg");
        assert_eq!(sniff_format(&out.bytes), Some(OutputFormat::Jpeg));

        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert!(!decoded.color().has_alpha());
        let rgb = decoded.into_rgb8();
        assert_eq!(rgb.dimensions(), (32, 16));
        // The formerly transparent half, one full MCU away from the red edge.
        for y in 0..16 {
            for x in 0..8 {
                let px = rgb.get_pixel(x, y).0;
                assert!(px.iter().all(|&c| c >= 250), "pixel ({x},{y}) = {px:?}");
            }
        }
    }

    #[test]
    fn test_convert_to_png_keeps_pixels() {
        let img = half_transparent(6, 4);
        let source = png_source("x.webp", &img);
        let out = convert_source(&source, OutputFormat::Png, 0.1).unwrap();

        let decoded = image::load_from_memory(&out.bytes).unwrap().into_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_round_trip_preserves_dimensions() {
        let source = png_source("wide.png", &half_transparent(23, 9));
        for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
            let out = convert_source(&source, format, 0.92).unwrap();
            assert_eq!((out.width, out.height), (23, 9));

            let decoded = image::load_from_memory(&out.bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (23, 9), "{format}");
        }
    }

    #[cfg(feature = "avif")]
    #[test]
    fn test_round_trip_avif_pixels() {
        let source = png_source("wide.png", &half_transparent(23, 9));
        let out = convert_source(&source, OutputFormat::Avif, 0.92).unwrap();
        assert_eq!(out.filename, "wide.avif");
        assert_eq!(sniff_format(&out.bytes), Some(OutputFormat::Avif));

        let decoded = decode_image(&out.bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (23, 9));

        let clear = decoded.pixel(2, 4).unwrap();
        let red = decoded.pixel(19, 4).unwrap();
        assert!(clear[3] < 30, "transparent side = {clear:?}");
        assert!(red[3] > 225, "opaque side = {red:?}");
        assert!(red[0] > 180 && red[1] < 80 && red[2] < 80, "opaque side = {red:?}");
    }

    #[cfg(feature = "avif")]
    #[test]
    fn test_convert_avif_source_to_png() {
        let source = png_source("wide.png", &half_transparent(23, 9));
        let avif = convert_source(&source, OutputFormat::Avif, 0.92).unwrap();

        let again = SourceFile::new("wide.avif", avif.bytes).with_media_type("image/avif");
        let out = convert_source(&again, OutputFormat::Png, 0.92).unwrap();
        assert_eq!(out.filename, "wide.png");
        assert_eq!((out.width, out.height), (23, 9));
        assert_eq!(sniff_format(&out.bytes), Some(OutputFormat::Png));
    }

    #[test]
    fn test_exif_rotation_survives_conversion() {
        let source = SourceFile::new("portrait.jpg", crate::decode::fixtures::rotated_jpeg());
        let out = convert_source(&source, OutputFormat::Png, 0.92).unwrap();
        assert_eq!((out.width, out.height), (8, 16));

        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 16));
    }

    #[test]
    fn test_text_file_is_decode_error() {
        let source = SourceFile::new("notes.txt", b"just some notes\n".to_vec())
            .with_media_type("text/plain");
        let err = convert_source(&source, OutputFormat::Png, 0.92).unwrap_err();
        assert!(matches!(err, ConvertError::Decode(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_empty_file_is_decode_error() {
        let source = SourceFile::new("empty.png", Vec::new()).with_media_type("image/png");
        let err = convert_source(&source, OutputFormat::WebP, 0.92).unwrap_err();
        assert!(matches!(err, ConvertError::Decode(DecodeError::EmptySource)));
    }

    #[test]
    fn test_declared_type_is_ignored() {
        let source = png_source("mislabeled.txt", &half_transparent(2, 2))
            .with_media_type("text/plain");
        let out = convert_source(&source, OutputFormat::Png, 0.92).unwrap();
        assert_eq!(out.filename, "mislabeled.png");
    }

    #[test]
    fn test_quality_does_not_change_name() {
        let source = png_source("a.png", &half_transparent(4, 4));
        let low = convert_source(&source, OutputFormat::Jpeg, 0.1).unwrap();
        let high = convert_source(&source, OutputFormat::Jpeg, 1.0).unwrap();
        assert_eq!(low.filename, high.filename);
    }
}
