//! Source files shared by decode and pipeline tests.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

/// A 16x8 JPEG (left half red, right half blue) tagged with EXIF
/// Orientation 6, meaning the stored pixels need a 90° clockwise turn.
pub(crate) fn rotated_jpeg() -> Vec<u8> {
    let stored = RgbImage::from_fn(16, 8, |x, _| {
        if x < 8 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });
    let mut jpeg = Cursor::new(Vec::new());
    stored.write_to(&mut jpeg, ImageFormat::Jpeg).unwrap();
    let jpeg = jpeg.into_inner();

    #[rustfmt::skip]
    let app1: &[u8] = &[
        0xFF, 0xE1, 0x00, 0x22, // APP1, length 34
        b'E', b'x', b'i', b'f', 0x00, 0x00,
        b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, // big-endian TIFF, IFD0 at 8
        0x00, 0x01, // one entry
        0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00, // Orientation = 6
        0x00, 0x00, 0x00, 0x00, // no IFD1
    ];

    // Splice the APP1 segment in right after SOI.
    let mut tagged = Vec::with_capacity(jpeg.len() + app1.len());
    tagged.extend_from_slice(&jpeg[..2]);
    tagged.extend_from_slice(app1);
    tagged.extend_from_slice(&jpeg[2..]);
    tagged
}
