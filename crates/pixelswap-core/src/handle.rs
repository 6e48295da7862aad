//! Transient handles to encoded output.
//!
//! A conversion result carries a handle the caller can use to fetch the
//! encoded bytes (in the browser, a `blob:` object URL). Handles are owned
//! and not `Clone`. They stay valid until explicitly revoked through the
//! store that created them. Nothing revokes them automatically.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An owned reference to published bytes.
#[derive(Debug, PartialEq, Eq)]
pub struct ObjectHandle {
    url: String,
}

impl ObjectHandle {
    /// Wrap a store-specific locator.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The locator, e.g. a `blob:` URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Backend that publishes encoded bytes behind revocable handles.
pub trait ObjectStore {
    type Error: fmt::Display;

    /// Publish `bytes` with the given MIME type.
    fn create(&self, bytes: &[u8], mime_type: &str) -> Result<ObjectHandle, Self::Error>;

    /// Revoke a handle. Revoking an unknown handle is a no-op.
    fn revoke(&self, handle: ObjectHandle);
}

/// A published object held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Arc<[u8]>,
    pub mime_type: String,
}

/// Process-local [`ObjectStore`] backed by a map.
///
/// Handles look like `memory:pixelswap/<n>`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the object behind a live handle URL.
    pub fn resolve(&self, url: &str) -> Option<StoredObject> {
        self.objects().get(url).cloned()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, StoredObject>> {
        // The map holds no invariants a panicking writer could break.
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectStore for MemoryStore {
    type Error = Infallible;

    fn create(&self, bytes: &[u8], mime_type: &str) -> Result<ObjectHandle, Self::Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("memory:pixelswap/{id}");
        self.objects().insert(
            url.clone(),
            StoredObject {
                bytes: Arc::from(bytes),
                mime_type: mime_type.to_string(),
            },
        );
        Ok(ObjectHandle::new(url))
    }

    fn revoke(&self, handle: ObjectHandle) {
        self.objects().remove(handle.url());
    }
}

impl<S: ObjectStore + ?Sized> ObjectStore for Arc<S> {
    type Error = S::Error;

    fn create(&self, bytes: &[u8], mime_type: &str) -> Result<ObjectHandle, Self::Error> {
        (**self).create(bytes, mime_type)
    }

    fn revoke(&self, handle: ObjectHandle) {
        (**self).revoke(handle)
    }
}
