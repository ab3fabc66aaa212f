//! Error types for the client library.

use thiserror::Error;

use consultia_core::CoreError;

/// Errors that can occur when using the client library.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure talking to the backend.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error status.
    #[error("Falha na comunicação com o servidor: {message}")]
    Api { status: u16, message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The local store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Domain error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}
