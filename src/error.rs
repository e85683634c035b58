// Credential load failures

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures raised while loading credentials or token files.
///
/// Every strategy catches these at its own boundary, logs them and
/// collapses the attempt to an unresolved result. Nothing here crosses the
/// mode dispatcher or the final fallback.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The referenced file does not exist.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// A parent directory of the referenced path does not exist.
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The file exists but does not have the expected JSON structure.
    #[error("invalid structure in {path}: {message}")]
    InvalidStructure { path: PathBuf, message: String },

    /// The underlying filesystem call failed.
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// Classify an I/O error against the path it was raised for.
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            let parent_missing = path
                .parent()
                .is_some_and(|parent| !parent.as_os_str().is_empty() && !parent.exists());

            if parent_missing {
                return LoadError::DirectoryNotFound(path.to_path_buf());
            }

            return LoadError::FileNotFound(path.to_path_buf());
        }

        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid(path: &Path, message: impl ToString) -> Self {
        LoadError::InvalidStructure {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}
