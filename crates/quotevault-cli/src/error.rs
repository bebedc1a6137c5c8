use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quotevault_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid {kind} id: {value}")]
    InvalidId { kind: &'static str, value: String },
    #[error("Collection name cannot be empty")]
    EmptyCollectionName,
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Failed to open local mirror at {path}: {reason}")]
    MirrorUnavailable { path: String, reason: String },
    #[error("Not signed in. Run `quotevault auth login` first.")]
    NotSignedIn,
    #[error("{0}")]
    Operation(String),
}
