//! WASM-compatible wrapper types for conversion output.
//!
//! This module provides JavaScript-friendly types that wrap the core Pixelswap
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use pixelswap_core::{ConversionResult, ConversionService, OutputFormat};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::convert::BlobUrlStore;

/// A converted image wrapper for JavaScript.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory and behind a `blob:` object URL.
/// `bytes()` copies them into a `Uint8Array`. The object URL stays valid
/// until `release()` is called; wasm-bindgen's finalizer frees the WASM
/// memory but does not revoke the URL.
#[wasm_bindgen]
pub struct JsConversionResult {
    inner: ConversionResult,
}

#[wasm_bindgen]
impl JsConversionResult {
    /// Suggested download name, e.g. `photo.webp`
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.inner.filename().to_string()
    }

    /// Object URL for the encoded bytes
    #[wasm_bindgen(getter)]
    pub fn url(&self) -> String {
        self.inner.url().to_string()
    }

    /// MIME type of the encoded bytes
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.format().mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Size of the encoded output in bytes
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes().len()
    }

    /// Returns the encoded bytes as a Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes().to_vec()
    }

    /// Revoke the object URL and free WASM memory.
    ///
    /// The result cannot be used afterwards.
    pub fn release(self) {
        ConversionService::new(BlobUrlStore).release_result(self.inner);
    }
}

impl JsConversionResult {
    pub(crate) fn from_result(inner: ConversionResult) -> Self {
        Self { inner }
    }
}

/// One entry of the format picker, as handed to JavaScript by `formats()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FormatInfo {
    pub mime: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub extension: &'static str,
    /// False when the quality slider has no effect (PNG).
    #[serde(rename = "usesQuality")]
    pub uses_quality: bool,
}

impl From<OutputFormat> for FormatInfo {
    fn from(format: OutputFormat) -> Self {
        Self {
            mime: format.mime_type(),
            label: format.label(),
            description: format.description(),
            extension: format.extension(),
            uses_quality: format.uses_quality(),
        }
    }
}

/// Resolve a MIME string coming from JavaScript to a known output format.
///
/// Anything outside the closed set is an error rather than a silent
/// fallback.
pub(crate) fn format_from_mime(mime: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_mime(mime).ok_or_else(|| format!("Unsupported output format: {mime}"))
}
