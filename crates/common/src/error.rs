//! Error types for the Mavis domain model

use thiserror::Error;

/// Result type alias using the domain Error
pub type Result<T> = std::result::Result<T, Error>;

/// Domain model error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown delivery site: {0}")]
    UnknownDeliverySite(String),

    #[error("Invalid NHS number {value}: {reason}")]
    InvalidNhsNumber { value: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
