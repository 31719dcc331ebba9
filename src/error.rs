//! QuoteSync error types

use thiserror::Error;

/// QuoteSync error type
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before touching the collection
    #[error("Validation error: {0}")]
    Validation(String),

    /// Import payload is not a JSON array of quotes
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// Key-value slot error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Slot exists but its bytes are not valid UTF-8
    #[error("Corrupt slot '{0}': not valid UTF-8")]
    CorruptSlot(String),

    /// Remote endpoint error
    #[error("Remote error: {0}")]
    Remote(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for QuoteSync operations
pub type Result<T> = std::result::Result<T, Error>;
