//! Byte access for archive entries and externally linked files.
//!
//! The archive reader itself lives outside this crate; readers only need a
//! way to fetch bytes by path, both for entries inside the package (embedded
//! images) and for files next to the document (linked images).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::common::{Error, Result};

/// Read the bytes of a file identified by an archive-relative or external path.
pub trait ReadFile: Send + Sync {
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// A [`ReadFile`] backed by an in-memory path → bytes table.
///
/// Used in tests and wherever the caller has already unpacked the archive.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFiles {
    entries: HashMap<String, Vec<u8>>,
}

impl InMemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any previous entry at the same path.
    pub fn insert(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(path.into(), bytes.into());
        self
    }
}

impl ReadFile for InMemoryFiles {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| Error::FileNotFound(path.to_string()))
    }
}

/// A lazy handle to image bytes: the path plus the reader that can fetch it.
///
/// Captured when the document model is built; the bytes are only fetched if
/// an image converter asks for them during rendering.
#[derive(Clone)]
pub struct ImageSource {
    path: String,
    reader: Arc<dyn ReadFile>,
}

impl ImageSource {
    pub fn new(path: impl Into<String>, reader: Arc<dyn ReadFile>) -> Self {
        Self {
            path: path.into(),
            reader,
        }
    }

    /// The archive-relative or external path of the image.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch the image bytes.
    pub fn read(&self) -> Result<Vec<u8>> {
        self.reader.read(&self.path)
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && Arc::ptr_eq(&self.reader, &other.reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_files_read_known_path() {
        let files = InMemoryFiles::new().insert("word/media/image1.png", vec![1, 2, 3]);
        assert_eq!(files.read("word/media/image1.png").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_in_memory_files_missing_path_is_an_error() {
        let files = InMemoryFiles::new();
        assert!(matches!(
            files.read("missing.png"),
            Err(Error::FileNotFound(_))
        ));
    }

    #[test]
    fn test_image_source_reads_lazily() {
        let files: Arc<dyn ReadFile> =
            Arc::new(InMemoryFiles::new().insert("word/media/image1.png", b"png".to_vec()));
        let source = ImageSource::new("word/media/image1.png", files);
        assert_eq!(source.read().unwrap(), b"png".to_vec());
    }
}
