use std::fmt;

use serde::{Deserialize, Serialize};

/// Marks a board position the player has not uncovered yet.
pub const PLACEHOLDER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single guessable letter, always in `A..=Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Letter(char);

impl Letter {
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_uppercase().then_some(Self(c))
    }

    pub fn as_char(self) -> char {
        self.0
    }

    /// `A` through `Z` in order.
    pub fn alphabet() -> impl Iterator<Item = Letter> {
        ('A'..='Z').map(Letter)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The word's reveal state as last reported by the game service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board(String);

impl Board {
    pub fn new(current: impl Into<String>) -> Self {
        Self(current.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_placeholder(&self) -> bool {
        self.0.contains(PLACEHOLDER)
    }

    /// Board positions, skipping any whitespace the service used as a separator.
    pub fn cells(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().filter(|c| !c.is_whitespace())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Idle,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}
