//! Offscreen drawing surface.
//!
//! A conversion never encodes the decoded raster directly. It allocates a
//! surface of the raster's natural size, optionally paints a backdrop, and
//! draws the raster on top with source-over compositing. The surface is
//! what gets encoded.
//!
//! # Compositing
//!
//! All math is straight-alpha integer arithmetic:
//!
//! - onto a fully transparent pixel the source is copied verbatim,
//!   including the color of fully transparent source pixels
//! - a fully transparent source pixel leaves a painted backdrop untouched
//! - a fully opaque source pixel replaces the destination
//! - otherwise `out = src·αs + dst·αd·(1−αs)`, normalized by the output alpha

use crate::decode::DecodedImage;
use crate::encode::EncodeError;
use crate::format::OutputFormat;

/// Opaque white, the backdrop for formats without alpha.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// RGBA8 drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Allocate a fully transparent surface.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidDimensions` if either side is zero or
    /// the buffer size overflows.
    pub fn new(width: u32, height: u32) -> Result<Self, EncodeError> {
        let len = buffer_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidDimensions` for zero-area surfaces and
    /// `EncodeError::InvalidPixelData` when the buffer length is not
    /// `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EncodeError> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(EncodeError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (x, y), or None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Paint every pixel with `color`.
    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Draw `image` with its top-left corner at the surface origin.
    ///
    /// Pixels falling outside the surface are clipped.
    pub fn draw_image(&mut self, image: &DecodedImage) {
        let cols = self.width.min(image.width) as usize;
        let rows = self.height.min(image.height) as usize;
        let dst_stride = self.width as usize * 4;
        let src_stride = image.width as usize * 4;

        for y in 0..rows {
            let dst_row = &mut self.pixels[y * dst_stride..y * dst_stride + cols * 4];
            let src_row = &image.pixels[y * src_stride..y * src_stride + cols * 4];
            for (dst, src) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                source_over(dst, src);
            }
        }
    }

    /// True when no pixel has partial or zero alpha.
    pub fn is_opaque(&self) -> bool {
        self.pixels.chunks_exact(4).all(|p| p[3] == u8::MAX)
    }

    /// Drop the alpha channel, producing packed RGB bytes.
    pub fn to_rgb_pixels(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() / 4 * 3);
        for px in self.pixels.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        rgb
    }
}

/// Produce the surface that gets encoded for `format`.
///
/// The surface matches the raster's natural size exactly. Formats without
/// an alpha channel (JPEG) get an opaque white backdrop so transparent
/// source pixels do not land on an undefined color; every other format
/// starts fully transparent.
pub fn rasterize(image: &DecodedImage, format: OutputFormat) -> Result<Surface, EncodeError> {
    let mut surface = Surface::new(image.width, image.height)?;
    if !format.supports_alpha() {
        surface.fill(WHITE);
    }
    surface.draw_image(image);
    Ok(surface)
}

fn buffer_len(width: u32, height: u32) -> Result<usize, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(EncodeError::InvalidDimensions { width, height })
}

#[inline]
fn source_over(dst: &mut [u8], src: &[u8]) {
    let sa = src[3] as u32;
    let da = dst[3] as u32;

    if da == 0 || sa == 255 {
        dst.copy_from_slice(src);
        return;
    }
    if sa == 0 {
        return;
    }

    let inv = 255 - sa;
    // Output alpha scaled by 255.
    let out_a = sa * 255 + da * inv;
    for c in 0..3 {
        let num = src[c] as u32 * sa * 255 + dst[c] as u32 * da * inv;
        dst[c] = ((num + out_a / 2) / out_a) as u8;
    }
    dst[3] = ((out_a + 127) / 255) as u8;
}
