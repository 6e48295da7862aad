//! Recognize encoded output by its leading bytes.
//!
//! Only the four output containers are recognized. This is the check the
//! format probe uses to confirm an encoder really produced what was asked.

use crate::format::OutputFormat;

const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Brands that mark an ISO-BMFF file as AVIF.
const AVIF_BRANDS: [&[u8; 4]; 2] = [b"avif", b"avis"];

/// Identify which output format `bytes` is encoded in.
pub fn sniff_format(bytes: &[u8]) -> Option<OutputFormat> {
    if bytes.starts_with(&JPEG_SOI) {
        return Some(OutputFormat::Jpeg);
    }
    if bytes.starts_with(&PNG_SIGNATURE) {
        return Some(OutputFormat::Png);
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some(OutputFormat::WebP);
    }
    if is_avif(bytes) {
        return Some(OutputFormat::Avif);
    }
    None
}

/// Check the leading `ftyp` box for an AVIF major or compatible brand.
fn is_avif(bytes: &[u8]) -> bool {
    if bytes.len() < 16 || &bytes[4..8] != b"ftyp" {
        return false;
    }
    let box_len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if box_len < 16 || box_len > bytes.len() {
        return false;
    }

    // major_brand, minor_version, then compatible brands to the end of the box
    let major = &bytes[8..12];
    let compatible = bytes[16..box_len].chunks_exact(4);

    std::iter::once(major)
        .chain(compatible)
        .any(|brand| AVIF_BRANDS.iter().any(|b| brand == &b[..]))
}
