use serde::{Deserialize, Serialize};

use crate::domain::{Board, SessionId};

pub fn new_game_route() -> &'static str {
    "/new"
}

pub fn guess_route() -> &'static str {
    "/guess"
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGameResponse {
    pub id: SessionId,
    pub current: Board,
    pub guesses_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessRequest {
    pub id: SessionId,
    pub guess: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SessionId>,
    pub current: Board,
    pub guesses_remaining: u32,
}
