//! Backend results delivered to the UI thread, and error modeling for them.

use client_core::ClientError;
use shared::{
    domain::{BaselineId, ProductId},
    error::{ErrorCode, ErrorResponse},
    protocol::BaselineSummary,
};

use crate::controller::baseline_list::ListGeneration;

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    ConfigurationItemsLoaded {
        count: usize,
    },
    ConfigurationItemsFailed(UiError),
    ProductsListed {
        query: String,
        ids: Vec<ProductId>,
    },
    ProductQueryFailed {
        query: String,
        error: UiError,
    },
    BaselinesLoaded {
        generation: ListGeneration,
        baselines: Vec<BaselineSummary>,
    },
    BaselinesFailed {
        generation: ListGeneration,
        error: UiError,
    },
    BaselinesDeleted {
        generation: ListGeneration,
        deleted: Vec<BaselineId>,
        failures: Vec<(BaselineId, UiError)>,
    },
    BaselineCreated(BaselineSummary),
    BaselineDuplicated {
        source: BaselineId,
        baseline: BaselineSummary,
    },
    BaselineOperationFailed(UiError),
    PartImportFinished {
        file_name: String,
        result: Result<(), UiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Conflict,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    ConfigurationItems,
    ProductQuery,
    BaselineList,
    BaselineDelete,
    BaselineCreate,
    BaselineDuplicate,
    PartImport,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
    response: Option<ErrorResponse>,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let category = classify_message(&message);
        Self {
            category,
            context,
            message,
            response: None,
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let message = err.to_string();
        let Some(response) = err.response() else {
            let category = match err {
                ClientError::Transport(_) => UiErrorCategory::Transport,
                ClientError::Config(_) | ClientError::Url(_) | ClientError::Io { .. } => {
                    UiErrorCategory::Validation
                }
                ClientError::Api(_) => classify_message(&message),
            };
            return Self {
                category,
                context,
                message,
                response: None,
            };
        };
        let category = match response.code() {
            ErrorCode::Unauthorized | ErrorCode::Forbidden => UiErrorCategory::Auth,
            ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::Conflict => UiErrorCategory::Conflict,
            ErrorCode::NotFound | ErrorCode::Internal => classify_message(&response.text),
        };
        Self {
            category,
            context,
            message,
            response: Some(response.clone()),
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn response(&self) -> Option<&ErrorResponse> {
        self.response.as_ref()
    }

    /// Server body text when there is one, otherwise the local message.
    pub fn display_message(&self) -> &str {
        self.response
            .as_ref()
            .and_then(ErrorResponse::display_text)
            .unwrap_or(&self.message)
    }
}

fn classify_message(message: &str) -> UiErrorCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("401")
        || lower.contains("403")
        || lower.contains("unauthorized")
        || lower.contains("forbidden")
    {
        UiErrorCategory::Auth
    } else if lower.contains("already exists") || lower.contains("conflict") {
        UiErrorCategory::Conflict
    } else if lower.contains("invalid") || lower.contains("missing") || lower.contains("malformed")
    {
        UiErrorCategory::Validation
    } else if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection")
        || lower.contains("network")
        || lower.contains("transport")
        || lower.contains("unavailable")
    {
        UiErrorCategory::Transport
    } else {
        UiErrorCategory::Unknown
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
