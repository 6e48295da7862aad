//! The user-supplied file handed to a conversion.

use std::path::Path;

use super::DecodeError;

/// Raw bytes of a user-selected file plus the metadata the browser reports
/// for it.
///
/// The declared media type is informational. Whether the bytes decode is
/// the only thing a conversion checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    media_type: Option<String>,
    bytes: Vec<u8>,
}

impl SourceFile {
    /// Create a source from a file name and its contents.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            bytes,
        }
    }

    /// Attach the declared media type (e.g. `image/png`).
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        self.media_type = (!media_type.is_empty()).then_some(media_type);
        self
    }

    /// Read a source from disk. The file name is the path's final component.
    ///
    /// A read failure is reported as a decode failure, since the source
    /// never became an image.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| DecodeError::IoError(e.to_string()))?;
        Ok(Self::new(file_name_of(path), bytes))
    }

    /// Original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type, if the caller supplied one.
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Full file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-byte file.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the declared media type is in the `image/*` family.
    ///
    /// This is the filter a drop zone applies before offering a file for
    /// conversion. `convert` itself does not consult it.
    pub fn is_image_media_type(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|t| t.to_ascii_lowercase().starts_with("image/"))
    }

    /// Short human summary, e.g. `"12.5 KB • PNG"`.
    ///
    /// The subtype is omitted when no media type was declared.
    pub fn summary(&self) -> String {
        let kb = self.bytes.len() as f64 / 1024.0;
        match self.media_type.as_deref().and_then(|t| t.split_once('/')) {
            Some((_, subtype)) if !subtype.is_empty() => {
                format!("{kb:.1} KB • {}", subtype.to_ascii_uppercase())
            }
            _ => format!("{kb:.1} KB"),
        }
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let src = SourceFile::new("cat.png", vec![1, 2, 3]).with_media_type("image/png");
        assert_eq!(src.name(), "cat.png");
        assert_eq!(src.media_type(), Some("image/png"));
        assert_eq!(src.bytes(), &[1, 2, 3]);
        assert_eq!(src.len(), 3);
        assert!(!src.is_empty());
    }

    #[test]
    fn test_empty_media_type_is_none() {
        let src = SourceFile::new("x", vec![]).with_media_type("");
        assert_eq!(src.media_type(), None);
        assert!(src.is_empty());
    }

    #[test]
    fn test_is_image_media_type() {
        let src = SourceFile::new("a.png", vec![]);
        assert!(!src.is_image_media_type());
        assert!(src.clone().with_media_type("Image/PNG").is_image_media_type());
        assert!(!src.with_media_type("text/plain").is_image_media_type());
    }

    #[test]
    fn test_summary() {
        let src = SourceFile::new("a.png", vec![0; 12_800]).with_media_type("image/png");
        assert_eq!(src.summary(), "12.5 KB • PNG");

        let src = SourceFile::new("a", vec![0; 512]);
        assert_eq!(src.summary(), "0.5 KB");

        let src = SourceFile::new("a.svg", vec![0; 1024]).with_media_type("image/svg+xml");
        assert_eq!(src.summary(), "1.0 KB • SVG+XML");
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = SourceFile::from_path("/definitely/not/here/photo.jpg");
        assert!(matches!(result, Err(DecodeError::IoError(_))));
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of(Path::new("/tmp/dir/photo.heic")), "photo.heic");
        assert_eq!(file_name_of(Path::new("/")), "");
    }
}
