//! Async conversion for native hosts.
//!
//! The pipeline suspends at each of its three stages: the file read goes
//! through `tokio::fs`, and decode and encode each run on the blocking
//! pool. Concurrent calls share nothing but the object store.
//!
//! Not available on `wasm32`, where JavaScript owns the async file read and
//! hands the bytes to the synchronous API.

use std::path::Path;

use tokio::task;

use crate::convert::encode_raster;
use crate::decode::{decode_image, file_name_of, DecodeError, SourceFile};
use crate::encode::EncodeError;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::handle::ObjectStore;
use crate::service::{ConversionResult, ConversionService};

impl<S: ObjectStore> ConversionService<S> {
    /// Read, decode and encode a file on disk without blocking the runtime.
    pub async fn convert_path(
        &self,
        path: impl AsRef<Path>,
        format: OutputFormat,
        quality: f32,
    ) -> Result<ConversionResult, ConvertError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DecodeError::IoError(e.to_string()))?;

        self.convert_async(SourceFile::new(file_name_of(path), bytes), format, quality)
            .await
    }

    /// Decode and encode an in-memory source on the blocking pool.
    pub async fn convert_async(
        &self,
        source: SourceFile,
        format: OutputFormat,
        quality: f32,
    ) -> Result<ConversionResult, ConvertError> {
        let name = source.name().to_string();

        let raster = task::spawn_blocking(move || decode_image(source.bytes()))
            .await
            .map_err(|e| DecodeError::CorruptedFile(format!("decode task failed: {e}")))??;

        let encoded = task::spawn_blocking(move || encode_raster(&raster, format, quality, &name))
            .await
            .map_err(|e| EncodeError::EncodingFailed {
                format,
                message: format!("encode task failed: {e}"),
            })??;

        self.publish(encoded)
    }
}
