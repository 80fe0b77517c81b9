//! Client-visible game session state and the pure rules that drive its transitions.

use std::collections::BTreeSet;

use shared::{
    domain::{Board, GameStatus, Letter, SessionId},
    protocol::{GuessResponse, NewGameResponse},
};

/// Trims and uppercases raw input, accepting exactly one letter in `A..=Z`.
pub fn normalize_guess(raw: &str) -> Option<Letter> {
    let upper = raw.trim().to_uppercase();
    let mut chars = upper.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Letter::new(first)
}

/// Status implied by a board and attempt count. A fully revealed board wins even when the
/// attempts are exhausted by the same response.
pub fn derive_status(board: &Board, attempts_remaining: u32) -> GameStatus {
    if board.is_empty() {
        GameStatus::Idle
    } else if !board.has_placeholder() {
        GameStatus::Won
    } else if attempts_remaining == 0 {
        GameStatus::Lost
    } else {
        GameStatus::Playing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    pub board: Board,
    pub attempts_remaining: u32,
    pub used_letters: BTreeSet<Letter>,
    pub status: GameStatus,
    pub busy: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct Session {
    pub(crate) session_id: Option<SessionId>,
    pub(crate) board: Board,
    pub(crate) attempts_remaining: u32,
    pub(crate) used_letters: BTreeSet<Letter>,
    pub(crate) status: GameStatus,
    pub(crate) busy: bool,
    pub(crate) last_error: Option<String>,
}

impl Session {
    pub(crate) fn begin(&mut self, game: NewGameResponse) {
        self.session_id = Some(game.id);
        self.board = game.current;
        self.attempts_remaining = game.guesses_remaining;
        self.used_letters.clear();
        self.status = GameStatus::Playing;
    }

    pub(crate) fn apply_guess(&mut self, letter: Letter, response: GuessResponse) -> GameStatus {
        self.board = response.current;
        self.attempts_remaining = response.guesses_remaining;
        self.used_letters.insert(letter);
        self.status = derive_status(&self.board, self.attempts_remaining);
        if self.status == GameStatus::Idle {
            self.session_id = None;
        }
        self.status
    }

    /// Drops the server-side identity. The last board stays visible.
    pub(crate) fn reset_to_idle(&mut self) {
        self.session_id = None;
        self.status = GameStatus::Idle;
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            board: self.board.clone(),
            attempts_remaining: self.attempts_remaining,
            used_letters: self.used_letters.clone(),
            status: self.status,
            busy: self.busy,
            last_error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
