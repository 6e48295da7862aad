//! The image conversion service.
//!
//! Couples the pure pipeline in [`convert`](crate::convert) with an
//! [`ObjectStore`] so that every successful conversion comes back with a
//! transient handle. The caller owns that handle and must hand the result
//! back through [`ConversionService::release_result`] once it is done.

use crate::convert::{convert_source, EncodedImage};
use crate::decode::SourceFile;
use crate::encode::EncodeError;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::handle::{MemoryStore, ObjectHandle, ObjectStore};
use crate::options::ConvertOptions;
use crate::probe;

/// Output of a successful conversion.
///
/// Not `Clone`: the embedded handle is released exactly once, by value.
#[derive(Debug)]
pub struct ConversionResult {
    bytes: Vec<u8>,
    handle: ObjectHandle,
    filename: String,
    format: OutputFormat,
    width: u32,
    height: u32,
}

impl ConversionResult {
    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Transient handle to the bytes (e.g. a `blob:` URL).
    pub fn handle(&self) -> &ObjectHandle {
        &self.handle
    }

    /// Shortcut for `handle().url()`.
    pub fn url(&self) -> &str {
        self.handle.url()
    }

    /// Suggested download name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Format the bytes were encoded as.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Output width in pixels, the source's upright natural width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels, the source's upright natural height.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Converts source files and publishes the output through an object store.
#[derive(Debug, Default)]
pub struct ConversionService<S = MemoryStore> {
    store: S,
}

impl ConversionService<MemoryStore> {
    /// Service backed by a process-local [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: ObjectStore> ConversionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The store handles are published through.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Convert `source` to `format` at `quality` (`0.0..=1.0`, see
    /// [`DEFAULT_QUALITY`](crate::DEFAULT_QUALITY)).
    ///
    /// # Errors
    ///
    /// `ConvertError::Decode` if the source is not a decodable image;
    /// `ConvertError::Encode` if encoding fails or no handle can be created.
    pub fn convert(
        &self,
        source: &SourceFile,
        format: OutputFormat,
        quality: f32,
    ) -> Result<ConversionResult, ConvertError> {
        let encoded = convert_source(source, format, quality)?;
        self.publish(encoded)
    }

    /// [`convert`](Self::convert) driven by a [`ConvertOptions`].
    pub fn convert_with(
        &self,
        source: &SourceFile,
        options: &ConvertOptions,
    ) -> Result<ConversionResult, ConvertError> {
        self.convert(source, options.format, options.quality)
    }

    /// Revoke the result's handle. Consumes the result.
    pub fn release_result(&self, result: ConversionResult) {
        self.store.revoke(result.handle);
    }

    /// See [`probe::is_format_supported`].
    pub fn is_format_supported(&self, format: OutputFormat) -> bool {
        probe::is_format_supported(format)
    }

    pub(crate) fn publish(&self, encoded: EncodedImage) -> Result<ConversionResult, ConvertError> {
        let handle = self
            .store
            .create(&encoded.bytes, encoded.format.mime_type())
            .map_err(|e| EncodeError::HandleUnavailable(e.to_string()))?;

        Ok(ConversionResult {
            bytes: encoded.bytes,
            handle,
            filename: encoded.filename,
            format: encoded.format,
            width: encoded.width,
            height: encoded.height,
        })
    }
}
