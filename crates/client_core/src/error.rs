use std::path::PathBuf;

use shared::error::{ApiException, ErrorResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("server rejected request: {0}")]
    Api(#[from] ApiException),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ClientError {
    /// The server's reply, when the failure came from a non-success status.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            ClientError::Api(exception) => Some(&exception.response),
            _ => None,
        }
    }
}
