//! Notice board WASM bindings.
//!
//! The board holds no timer. JavaScript passes `Date.now()` to `show` and
//! calls `expire` from its own `setTimeout`, scheduled with `next_expiry`.

use pixelswap_core::{NoticeBoard, NoticeId, NoticeKind};
use wasm_bindgen::prelude::*;

/// Notice board wrapper for JavaScript
#[wasm_bindgen]
#[derive(Default)]
pub struct JsNoticeBoard {
    inner: NoticeBoard,
}

#[wasm_bindgen]
impl JsNoticeBoard {
    /// Create a board with the default 4 second lifetime
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notice of `kind` (`"success"`, `"error"` or `"info"`).
    ///
    /// Returns the notice id.
    pub fn show(&mut self, message: &str, kind: &str, now_ms: f64) -> Result<f64, JsValue> {
        let kind = notice_kind(kind).map_err(|e| JsValue::from_str(&e))?;
        let id = self.inner.show(message, kind, js_u64(now_ms));
        Ok(id.0 as f64)
    }

    /// Remove a notice early. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: f64) -> bool {
        self.inner.dismiss(NoticeId(js_u64(id)))
    }

    /// Drop expired notices, returning their ids.
    pub fn expire(&mut self, now_ms: f64) -> Vec<f64> {
        self.inner
            .expire(js_u64(now_ms))
            .into_iter()
            .map(|id| id.0 as f64)
            .collect()
    }

    /// Visible notices as `[{ id, message, kind, expiresAt }]`, oldest first.
    pub fn notices(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.active())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Earliest pending expiry time, or `undefined` when the board is empty
    pub fn next_expiry(&self) -> Option<f64> {
        self.inner.next_expiry().map(|t| t as f64)
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }
}

fn notice_kind(kind: &str) -> Result<NoticeKind, String> {
    match kind {
        "success" => Ok(NoticeKind::Success),
        "error" => Ok(NoticeKind::Error),
        "info" => Ok(NoticeKind::Info),
        other => Err(format!("Unknown notice kind: {other}")),
    }
}

/// JavaScript number to `u64`. Fractions truncate; negative and NaN become 0.
fn js_u64(value: f64) -> u64 {
    value as u64
}
