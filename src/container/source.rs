use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::foundation::error::GifResult;

/// Location of encoded GIF bytes.
///
/// Handles are re-opened from their source during recovery, so a [`ImageSource::Path`] is read
/// again every time. A file that was still being written when first opened can therefore heal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// A local file.
    Path(PathBuf),
    /// An in-memory buffer shared between handles.
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    /// Source backed by a local file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Source backed by an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Read the current contents of the source.
    pub fn read(&self) -> GifResult<Arc<[u8]>> {
        match self {
            Self::Path(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read gif file '{}'", path.display()))?;
                Ok(Arc::from(bytes))
            }
            Self::Bytes(bytes) => Ok(Arc::clone(bytes)),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "'{}'", path.display()),
            Self::Bytes(bytes) => write!(f, "<{} in-memory bytes>", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Arc::from(bytes))
    }
}
