//! Unified error types for the quince library.
//!
//! Only structural failures are expressed as `Error`: a conversion either
//! returns a best-effort value together with [`Message`](super::Message)
//! diagnostics, or fails fatally with one of these variants.
use thiserror::Error;

/// Main error type for quince operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required file or archive entry could not be read
    #[error("Could not read file: {0}")]
    FileNotFound(String),

    /// The document part is missing a required element
    #[error("Could not find the body element: are you sure this is a docx file?")]
    MissingBody,

    /// An image converter failed to produce a value
    #[error("Image conversion failed: {0}")]
    ImageConversion(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for quince operations.
pub type Result<T> = std::result::Result<T, Error>;
