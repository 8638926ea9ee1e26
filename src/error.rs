//! Centralized error types for algebraix-fetch.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the algebraix-fetch library.
#[derive(Error, Debug)]
pub enum FetchError {
    /// A required page element (sender name, body text) is absent.
    ///
    /// The page contract has been violated; there is no safe recovery and
    /// the run aborts.
    #[error("required page element missing: {0}")]
    Extraction(String),

    /// An attachment GET returned a non-success status. Fatal, no retry.
    #[error("download failed for '{url}': HTTP status {status}")]
    Download { url: String, status: u16 },

    /// The transport could not complete a GET at all (DNS, TLS, connection).
    #[error("transport error for '{url}': {reason}")]
    Transport { url: String, reason: String },

    /// The browser/page driver failed (lost tab, protocol error, launch failure).
    #[error("page driver error: {0}")]
    Page(String),

    /// I/O error with the associated file path.
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The identities file is missing or malformed.
    #[error("invalid identities file '{path}': {reason}")]
    Roster { path: PathBuf, reason: String },
}

/// Convenience alias for `Result<T, FetchError>`.
pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` inside functions returning `FetchError`
/// when no path context is available (rare — prefer `FetchError::io`).
impl From<std::io::Error> for FetchError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
