use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            409 => ErrorCode::Conflict,
            400 | 422 => ErrorCode::Validation,
            _ => ErrorCode::Internal,
        }
    }
}

/// A non-success reply from the workspace API: status plus raw body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub text: String,
}

impl ErrorResponse {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::from_status(self.status)
    }

    /// Body text worth showing to a user; blank bodies count as absent.
    pub fn display_text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Clone, Error)]
#[error("{code:?} ({}): {}", .response.status, .response.text)]
pub struct ApiException {
    pub code: ErrorCode,
    pub response: ErrorResponse,
}

impl ApiException {
    pub fn new(response: ErrorResponse) -> Self {
        Self {
            code: response.code(),
            response,
        }
    }
}
