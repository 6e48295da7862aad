//! AVIF source decoding.
//!
//! `image` only carries the rav1e encoder for AVIF. Sources are read here
//! instead: avif-parse splits the HEIF container into its color and alpha
//! AV1 items, and rav1d (the pure Rust dav1d port) decodes each item.

use std::io::Cursor;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use rav1d::include::dav1d::data::Dav1dData;
use rav1d::include::dav1d::dav1d::Dav1dSettings;
use rav1d::include::dav1d::headers::{
    DAV1D_PIXEL_LAYOUT_I400, DAV1D_PIXEL_LAYOUT_I420, DAV1D_PIXEL_LAYOUT_I422,
    DAV1D_PIXEL_LAYOUT_I444,
};
use rav1d::include::dav1d::picture::Dav1dPicture;
use rav1d::src::lib::{
    dav1d_close, dav1d_data_create, dav1d_data_unref, dav1d_default_settings, dav1d_get_picture,
    dav1d_open, dav1d_picture_unref, dav1d_send_data,
};
use tracing::debug;

use super::types::{DecodeError, DecodedImage};

/// Decode an AVIF file into a straight-alpha RGBA raster.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` when the container cannot be parsed,
/// an AV1 item fails to decode, or the alpha plane does not match the color
/// plane.
pub(crate) fn decode_avif(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let avif = avif_parse::read_avif(&mut Cursor::new(bytes))
        .map_err(|e| DecodeError::CorruptedFile(format!("AVIF container: {e:?}")))?;

    let color = decode_av1(&avif.primary_item)?;
    let alpha = match &avif.alpha_item {
        Some(item) => Some(decode_av1(item)?),
        None => None,
    };
    debug!(
        width = color.width,
        height = color.height,
        bpc = color.bpc,
        alpha = alpha.is_some(),
        "decoded AVIF items"
    );

    let pixels = color.to_rgba(alpha.as_ref())?;
    Ok(DecodedImage::new(color.width, color.height, pixels))
}

/// Chroma layout of a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chroma {
    /// Luma only (I400). Alpha items are always monochrome.
    Mono,
    /// Horizontal and vertical chroma subsampling (I420 is `true, true`).
    Subsampled { x: bool, y: bool },
}

/// One decoded AV1 frame, copied out of the decoder's buffers.
///
/// Samples are widened to `u16` so 8, 10 and 12 bit frames share one path.
#[derive(Debug)]
struct Frame {
    width: u32,
    height: u32,
    bpc: u32,
    chroma: Chroma,
    y: Vec<u16>,
    u: Vec<u16>,
    v: Vec<u16>,
}

impl Frame {
    fn chroma_width(&self) -> usize {
        match self.chroma {
            Chroma::Subsampled { x: true, .. } => (self.width as usize + 1) / 2,
            _ => self.width as usize,
        }
    }

    /// Interleave to RGBA8 with BT.601 full-range coefficients.
    ///
    /// `alpha` must be a frame of the same size; its luma plane becomes the
    /// alpha channel. Without it every pixel is opaque.
    fn to_rgba(&self, alpha: Option<&Frame>) -> Result<Vec<u8>, DecodeError> {
        if let Some(a) = alpha {
            if (a.width, a.height) != (self.width, self.height) {
                return Err(DecodeError::CorruptedFile(format!(
                    "AVIF alpha plane is {}x{}, color plane is {}x{}",
                    a.width, a.height, self.width, self.height
                )));
            }
        }

        let max = ((1u32 << self.bpc) - 1) as f32;
        let center = (1u32 << (self.bpc - 1)) as f32;
        let scale = 255.0 / max;
        let width = self.width as usize;
        let chroma_width = self.chroma_width();

        let mut rgba = Vec::with_capacity(width * self.height as usize * 4);
        for row in 0..self.height as usize {
            for col in 0..width {
                let i = row * width + col;
                let y = f32::from(self.y[i]);
                let (r, g, b) = match self.chroma {
                    Chroma::Mono => (y, y, y),
                    Chroma::Subsampled { x: ss_x, y: ss_y } => {
                        let cx = if ss_x { col / 2 } else { col };
                        let cy = if ss_y { row / 2 } else { row };
                        let j = cy * chroma_width + cx;
                        let cb = f32::from(self.u[j]) - center;
                        let cr = f32::from(self.v[j]) - center;
                        (
                            y + 1.402 * cr,
                            y - 0.344_136 * cb - 0.714_136 * cr,
                            y + 1.772 * cb,
                        )
                    }
                };
                let a = match alpha {
                    Some(a) => to_u8(f32::from(a.y[i]) * 255.0 / a.max_sample()),
                    None => u8::MAX,
                };
                rgba.extend_from_slice(&[to_u8(r * scale), to_u8(g * scale), to_u8(b * scale), a]);
            }
        }
        Ok(rgba)
    }

    fn max_sample(&self) -> f32 {
        ((1u32 << self.bpc) - 1) as f32
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn av1_error(step: &str, code: i32) -> DecodeError {
    DecodeError::CorruptedFile(format!("AV1 {step} failed ({code})"))
}

/// Run one AV1 item through a single-threaded rav1d decoder.
fn decode_av1(obu: &[u8]) -> Result<Frame, DecodeError> {
    let mut settings = MaybeUninit::<Dav1dSettings>::uninit();
    // SAFETY: dav1d_default_settings writes every field.
    let mut settings = unsafe {
        dav1d_default_settings(NonNull::from(&mut settings).cast());
        settings.assume_init()
    };
    settings.n_threads = 1;
    settings.max_frame_delay = 1;

    let mut ctx = None;
    // SAFETY: both pointers come from live locals.
    let rc = unsafe { dav1d_open(NonNull::new(&mut ctx), NonNull::new(&mut settings)) };
    if rc.0 != 0 {
        return Err(av1_error("open", rc.0));
    }

    let frame = (|| {
        let mut data = Dav1dData::default();
        // SAFETY: `data` is a live local; the returned buffer holds `obu.len()` bytes.
        let buf = unsafe { dav1d_data_create(NonNull::new(&mut data), obu.len()) };
        if buf.is_null() {
            return Err(av1_error("data_create", -1));
        }
        // SAFETY: `buf` was just allocated with room for `obu.len()` bytes.
        unsafe { std::ptr::copy_nonoverlapping(obu.as_ptr(), buf, obu.len()) };

        // SAFETY: `ctx` is open and `data` owns the buffer.
        let rc = unsafe { dav1d_send_data(ctx, NonNull::new(&mut data)) };
        if rc.0 != 0 {
            // SAFETY: the decoder did not take `data`, so it is released here.
            unsafe { dav1d_data_unref(NonNull::new(&mut data)) };
            return Err(av1_error("send_data", rc.0));
        }

        // SAFETY: an all-zero picture is the empty state dav1d expects.
        let mut pic: Dav1dPicture = unsafe { std::mem::zeroed() };
        // SAFETY: `ctx` is open and `pic` is a live local.
        let rc = unsafe { dav1d_get_picture(ctx, NonNull::new(&mut pic)) };
        if rc.0 != 0 {
            return Err(av1_error("get_picture", rc.0));
        }

        // SAFETY: `pic` was filled by dav1d_get_picture and is unreferenced
        // only after its planes are copied.
        let frame = unsafe { copy_frame(&pic) };
        unsafe { dav1d_picture_unref(NonNull::new(&mut pic)) };
        frame
    })();

    // SAFETY: `ctx` was opened above and is closed exactly once.
    unsafe { dav1d_close(NonNull::new(&mut ctx)) };
    frame
}

/// Copy the planes of a decoded picture into owned buffers.
///
/// # Safety
///
/// `pic` must hold a picture returned by `dav1d_get_picture` that has not
/// been unreferenced.
unsafe fn copy_frame(pic: &Dav1dPicture) -> Result<Frame, DecodeError> {
    let width = u32::try_from(pic.p.w).map_err(|_| av1_error("frame width", pic.p.w))?;
    let height = u32::try_from(pic.p.h).map_err(|_| av1_error("frame height", pic.p.h))?;
    let bpc = u32::try_from(pic.p.bpc).map_err(|_| av1_error("bit depth", pic.p.bpc))?;
    if width == 0 || height == 0 || !(8..=16).contains(&bpc) {
        return Err(DecodeError::CorruptedFile(format!(
            "AV1 frame {width}x{height} at {bpc} bits is not decodable"
        )));
    }

    let chroma = match pic.p.layout {
        DAV1D_PIXEL_LAYOUT_I400 => Chroma::Mono,
        DAV1D_PIXEL_LAYOUT_I420 => Chroma::Subsampled { x: true, y: true },
        DAV1D_PIXEL_LAYOUT_I422 => Chroma::Subsampled { x: true, y: false },
        DAV1D_PIXEL_LAYOUT_I444 => Chroma::Subsampled { x: false, y: false },
        other => {
            return Err(DecodeError::CorruptedFile(format!(
                "unsupported AV1 pixel layout {other}"
            )))
        }
    };

    // SAFETY: forwarded from the caller; plane sizes follow the layout.
    let y = unsafe { copy_plane(pic.data[0], pic.stride[0], width, height, bpc)? };
    let (u, v) = match chroma {
        Chroma::Mono => (Vec::new(), Vec::new()),
        Chroma::Subsampled { x, y: ss_y } => {
            let cw = if x { (width + 1) / 2 } else { width };
            let ch = if ss_y { (height + 1) / 2 } else { height };
            // SAFETY: as above.
            unsafe {
                (
                    copy_plane(pic.data[1], pic.stride[1], cw, ch, bpc)?,
                    copy_plane(pic.data[2], pic.stride[1], cw, ch, bpc)?,
                )
            }
        }
    };

    Ok(Frame {
        width,
        height,
        bpc,
        chroma,
        y,
        u,
        v,
    })
}

/// Read `width * height` samples from a strided plane. Depths above 8 bits
/// are stored as native-endian `u16`.
///
/// # Safety
///
/// `data` must point to a plane of at least `height` rows of `stride` bytes,
/// each holding `width` samples.
unsafe fn copy_plane<T>(
    data: Option<NonNull<T>>,
    stride: isize,
    width: u32,
    height: u32,
    bpc: u32,
) -> Result<Vec<u16>, DecodeError> {
    let base = data
        .ok_or_else(|| DecodeError::CorruptedFile("AV1 plane is missing".to_string()))?
        .as_ptr() as *const u8;

    let mut out = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height as isize {
        // SAFETY: rows are `stride` bytes apart within the plane.
        let line = unsafe { base.offset(row * stride) };
        for col in 0..width as usize {
            // SAFETY: `col < width` stays inside the row.
            let sample = unsafe {
                if bpc <= 8 {
                    u16::from(*line.add(col))
                } else {
                    (line.add(col * 2) as *const u16).read_unaligned()
                }
            };
            out.push(sample);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_avif;
    use crate::surface::Surface;

    fn avif_bytes(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        let surface = Surface::from_raw(width, height, pixels).unwrap();
        encode_avif(&surface, 90).unwrap()
    }

    #[test]
    fn test_decode_avif_opaque() {
        let bytes = avif_bytes(16, 12, |_, _| [220, 30, 30, 255]);
        let img = decode_avif(&bytes).unwrap();

        assert_eq!((img.width, img.height), (16, 12));
        assert_eq!(img.pixels.len(), 16 * 12 * 4);
        let [r, g, b, a] = img.pixel(8, 6).unwrap();
        assert!(r > 150 && g < 90 && b < 90, "got {:?}", [r, g, b]);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_decode_avif_alpha() {
        let bytes = avif_bytes(16, 16, |x, _| {
            if x < 8 {
                [0, 0, 255, 0]
            } else {
                [0, 0, 255, 255]
            }
        });
        let img = decode_avif(&bytes).unwrap();

        assert_eq!((img.width, img.height), (16, 16));
        assert!(img.pixel(2, 8).unwrap()[3] < 30);
        assert!(img.pixel(13, 8).unwrap()[3] > 225);
    }

    #[test]
    fn test_decode_avif_garbage() {
        let mut bytes = avif_bytes(8, 8, |_, _| [0, 0, 0, 255]);
        bytes.truncate(40);
        assert!(matches!(
            decode_avif(&bytes),
            Err(DecodeError::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_frame_to_rgba_grey() {
        let frame = Frame {
            width: 2,
            height: 1,
            bpc: 8,
            chroma: Chroma::Subsampled { x: false, y: false },
            y: vec![0, 255],
            u: vec![128, 128],
            v: vec![128, 128],
        };
        let rgba = frame.to_rgba(None).unwrap();
        assert_eq!(rgba, vec![0, 0, 0, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_frame_to_rgba_ten_bit_mono_alpha() {
        let color = Frame {
            width: 1,
            height: 1,
            bpc: 10,
            chroma: Chroma::Mono,
            y: vec![1023],
            u: Vec::new(),
            v: Vec::new(),
        };
        let alpha = Frame {
            width: 1,
            height: 1,
            bpc: 8,
            chroma: Chroma::Mono,
            y: vec![0],
            u: Vec::new(),
            v: Vec::new(),
        };
        assert_eq!(color.to_rgba(Some(&alpha)).unwrap(), vec![255, 255, 255, 0]);
    }

    #[test]
    fn test_frame_alpha_size_mismatch() {
        let frame = |w| Frame {
            width: w,
            height: 1,
            bpc: 8,
            chroma: Chroma::Mono,
            y: vec![0; w as usize],
            u: Vec::new(),
            v: Vec::new(),
        };
        assert!(frame(2).to_rgba(Some(&frame(1))).is_err());
    }
}
