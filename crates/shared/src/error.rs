use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    MethodNotAllowed,
    Internal,
    Transport,
    MalformedResponse,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            400..=499 => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Failure reported by, or while talking to, the game service.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: None,
            message: message.into(),
        }
    }

    /// Builds the error for a non-success response. An empty body falls back to `HTTP <status>`.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body.to_string()
        };
        Self {
            code: ErrorCode::from_status(status),
            status: Some(status),
            message,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedResponse, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}
