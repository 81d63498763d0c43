//! Centralized error types for netiquette.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the netiquette library.
///
/// Rule violations are not errors: they are collected as
/// [`Violation`](crate::model::violation::Violation) values.
#[derive(Error, Debug)]
pub enum NetiquetteError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The input is not valid UTF-8 text.
    #[error("File is not valid UTF-8 text: {0}")]
    InvalidEncoding(PathBuf),

    /// The header block could not be parsed; the message is undetermined.
    #[error("Cannot parse content: {0}")]
    Parse(String),

    /// A rich-text chat message could not be decoded.
    #[error("Invalid rich-text message: {0}")]
    InvalidMessage(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, NetiquetteError>`.
pub type Result<T> = std::result::Result<T, NetiquetteError>;

impl NetiquetteError {
    /// Create an `Io` variant from a path and an `io::Error`.
    ///
    /// A missing file is reported as [`NetiquetteError::FileNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (stdin, writers). Prefer `NetiquetteError::io` for files.
impl From<std::io::Error> for NetiquetteError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<stdin>"),
            source,
        }
    }
}
