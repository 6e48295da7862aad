//! Image conversion WASM bindings.
//!
//! This module exposes the pixelswap-core conversion service to JavaScript,
//! publishing each encoded output as a `blob:` object URL.
//!
//! # Functions
//!
//! - [`convert`] - Decode, rasterize and re-encode a file's bytes
//! - [`is_format_supported`] - Probe whether this build can encode a format
//! - [`derive_name`] - Output filename for a source name and target format
//! - [`formats`] - The format picker catalog
//!
//! # Example
//!
//! ```typescript
//! import { convert, download } from '@pixelswap/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = convert(bytes, file.name, { format: 'image/webp', quality: 0.92 });
//! download(result.url, result.filename);
//! result.release();
//! ```

use pixelswap_core::{
    ConversionService, ConvertOptions, ObjectHandle, ObjectStore, OutputFormat, SourceFile,
};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::types::{format_from_mime, FormatInfo, JsConversionResult};

/// Object store backed by the browser's Blob URL registry.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BlobUrlStore;

impl ObjectStore for BlobUrlStore {
    type Error = String;

    fn create(&self, bytes: &[u8], mime_type: &str) -> Result<ObjectHandle, Self::Error> {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_error_message)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(js_error_message)?;
        Ok(ObjectHandle::new(url))
    }

    fn revoke(&self, handle: ObjectHandle) {
        if let Err(e) = Url::revoke_object_url(handle.url()) {
            web_sys::console::warn_2(&JsValue::from_str("Failed to revoke object URL"), &e);
        }
    }
}

fn js_error_message(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Convert a file's bytes to another format.
///
/// # Arguments
///
/// * `bytes` - Full contents of the source file
/// * `file_name` - Original file name, used to derive the output name
/// * `options` - `{ format?: string, quality?: number }`; `undefined` or
///   `null` selects WEBP at 0.92
///
/// # Errors
///
/// Rejects with a message string if the options are malformed, the bytes
/// do not decode as an image, or encoding fails.
#[wasm_bindgen]
pub fn convert(
    bytes: Vec<u8>,
    file_name: &str,
    options: JsValue,
) -> Result<JsConversionResult, JsValue> {
    let options = options_from_js(options)?;
    let source = SourceFile::new(file_name, bytes);

    ConversionService::new(BlobUrlStore)
        .convert_with(&source, &options)
        .map(JsConversionResult::from_result)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn options_from_js(value: JsValue) -> Result<ConvertOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(ConvertOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether this build can encode the given MIME type.
///
/// Unknown MIME types are simply unsupported.
#[wasm_bindgen]
pub fn is_format_supported(mime: &str) -> bool {
    OutputFormat::from_mime(mime).is_some_and(pixelswap_core::is_format_supported)
}

/// Output filename for `file_name` converted to `mime`.
#[wasm_bindgen]
pub fn derive_name(file_name: &str, mime: &str) -> Result<String, JsValue> {
    let format = format_from_mime(mime).map_err(|e| JsValue::from_str(&e))?;
    Ok(pixelswap_core::derive_name(file_name, format))
}

/// The format picker catalog, in display order.
///
/// Returns an array of `{ mime, label, description, extension, usesQuality }`.
#[wasm_bindgen]
pub fn formats() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&format_catalog())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn format_catalog() -> Vec<FormatInfo> {
    OutputFormat::ALL.into_iter().map(FormatInfo::from).collect()
}
