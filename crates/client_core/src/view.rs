//! Presentation model derived from a session snapshot.

use shared::domain::{GameStatus, Letter};

use crate::session::SessionSnapshot;

const SESSION_LABEL_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyView {
    pub letter: Letter,
    pub used: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub title: &'static str,
    pub subtitle: String,
    pub board: Option<String>,
    pub session_label: Option<String>,
    pub used_count: usize,
    pub error: Option<String>,
    pub keys: Vec<KeyView>,
    pub input_enabled: bool,
    pub restart_label: &'static str,
    pub restart_enabled: bool,
    pub end_message: Option<&'static str>,
}

impl GameView {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let status = snapshot.status;
        let input_enabled = !snapshot.busy && status == GameStatus::Playing;

        let title = match status {
            GameStatus::Won => "You won!",
            GameStatus::Lost => "You lost",
            GameStatus::Idle | GameStatus::Playing => "Word Game",
        };

        let subtitle = match status {
            GameStatus::Idle => "Start a game to play.".to_string(),
            _ => format!("Attempts remaining: {}", snapshot.attempts_remaining),
        };

        let board = (!snapshot.board.is_empty()).then(|| {
            snapshot
                .board
                .cells()
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        });

        let session_label = snapshot
            .session_id
            .as_ref()
            .map(|id| short_label(id.as_str()));

        let keys = Letter::alphabet()
            .map(|letter| {
                let used = snapshot.used_letters.contains(&letter);
                KeyView {
                    letter,
                    used,
                    enabled: input_enabled && !used,
                }
            })
            .collect();

        let end_message = match status {
            GameStatus::Won => Some("Well played. Another round?"),
            GameStatus::Lost => Some("Out of attempts. Want to try again?"),
            GameStatus::Idle | GameStatus::Playing => None,
        };

        Self {
            title,
            subtitle,
            board,
            session_label,
            used_count: snapshot.used_letters.len(),
            error: snapshot.last_error.clone(),
            keys,
            input_enabled,
            restart_label: if status == GameStatus::Playing {
                "Restart"
            } else {
                "New game"
            },
            restart_enabled: !snapshot.busy,
            end_message,
        }
    }
}

fn short_label(id: &str) -> String {
    let mut label: String = id.chars().take(SESSION_LABEL_CHARS).collect();
    label.push('…');
    label
}
