//! Error types for calsync-fs

use std::path::PathBuf;

/// Result type for calsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in calsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to overwrite existing file at {path}")]
    AlreadyExists { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
