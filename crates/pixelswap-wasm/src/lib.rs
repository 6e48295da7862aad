//! Pixelswap WASM - WebAssembly bindings for Pixelswap
//!
//! This crate provides WASM bindings to expose the pixelswap-core conversion
//! service to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `convert` - Conversion, format probe, name derivation and the format catalog
//! - `types` - WASM-compatible wrapper types for conversion output
//! - `download` - Anchor-click download helper
//! - `notice` - Toast notice board
//!
//! # Usage
//!
//! ```typescript
//! import init, { convert, download, is_format_supported } from '@pixelswap/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! if (is_format_supported('image/avif')) {
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   const result = convert(bytes, file.name, { format: 'image/avif', quality: 0.8 });
//!   download(result.url, result.filename);
//!   result.release();
//! }
//! ```

use wasm_bindgen::prelude::*;

mod convert;
mod download;
mod notice;
mod types;

// Re-export public types
pub use convert::{convert, derive_name, formats, is_format_supported};
pub use download::download;
pub use notice::JsNoticeBoard;
pub use types::JsConversionResult;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "pixelswap-wasm {} ready",
        version()
    )));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
