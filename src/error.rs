//! Error types for docstream operations.

use thiserror::Error;

/// Errors that can occur while loading documents or writing rendered output.
///
/// Event generation, style diffing and run consolidation are total and never
/// produce errors; everything here comes from the I/O boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
