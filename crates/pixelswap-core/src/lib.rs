//! Pixelswap Core - Image conversion library
//!
//! This crate provides the conversion pipeline behind Pixelswap: decoding a
//! user-selected image, rasterizing it onto a drawing surface, re-encoding
//! it as JPEG, PNG, WEBP or AVIF, and publishing the result through a
//! transient object handle.
//!
//! The entry point is [`ConversionService`]:
//!
//! ```ignore
//! use pixelswap_core::{ConversionService, OutputFormat, SourceFile};
//!
//! let service = ConversionService::in_memory();
//! let source = SourceFile::new("photo.png", std::fs::read("photo.png")?);
//! let result = service.convert(&source, OutputFormat::WebP, 0.92)?;
//! assert_eq!(result.filename(), "photo.webp");
//! service.release_result(result);
//! ```

pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod handle;
pub mod notice;
pub mod options;
pub mod probe;
pub mod service;
pub mod surface;

#[cfg(not(target_arch = "wasm32"))]
mod runtime;

pub use convert::{convert_source, derive_name, encode_raster, EncodedImage};
pub use decode::{decode_image, DecodeError, DecodedImage, SourceFile};
pub use encode::{encode_surface, quality_percent, EncodeError, DEFAULT_QUALITY};
pub use error::{ConvertError, ErrorKind};
pub use format::{OutputFormat, UnknownFormat};
pub use handle::{MemoryStore, ObjectHandle, ObjectStore, StoredObject};
pub use notice::{Notice, NoticeBoard, NoticeId, NoticeKind, DEFAULT_NOTICE_TTL_MS};
pub use options::ConvertOptions;
pub use probe::{is_format_supported, supported_formats};
pub use service::{ConversionResult, ConversionService};
pub use surface::{rasterize, Surface};
