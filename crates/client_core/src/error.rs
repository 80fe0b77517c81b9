//! Errors surfaced by the session controller to its caller.

use shared::error::{ApiException, ErrorCode};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameErrorKind {
    /// Any failed round trip other than a guess against a discarded session.
    Transport,
    /// The game service no longer knows the session a guess was sent for.
    SessionGone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameErrorContext {
    Start,
    Guess,
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GameError {
    kind: GameErrorKind,
    context: GameErrorContext,
    code: ErrorCode,
    status: Option<u16>,
    message: String,
}

impl GameError {
    pub fn from_api(context: GameErrorContext, err: ApiException) -> Self {
        let kind = if context == GameErrorContext::Guess && err.is_not_found() {
            GameErrorKind::SessionGone
        } else {
            GameErrorKind::Transport
        };

        Self {
            kind,
            context,
            code: err.code,
            status: err.status,
            message: err.message,
        }
    }

    pub fn is_session_gone(&self) -> bool {
        self.kind == GameErrorKind::SessionGone
    }

    pub fn kind(&self) -> GameErrorKind {
        self.kind
    }

    pub fn context(&self) -> GameErrorContext {
        self.context
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
