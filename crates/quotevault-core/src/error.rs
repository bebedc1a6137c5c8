//! Error types for quotevault-core

use thiserror::Error;

use crate::auth::AuthError;

/// Result type alias using quotevault-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotevault-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced an HTTP response (DNS, TLS, connection reset)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Missing or rejected credentials
    #[error("You need to sign in to perform this action")]
    Unauthorized,

    /// Requested resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected record shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Non-success status with a server-provided message
    #[error("{0}")]
    Server(String),

    /// Anything the gateway could not classify
    #[error("An unknown error occurred: {0}")]
    Unknown(String),

    /// libSQL error
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Auth API or session storage error
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
