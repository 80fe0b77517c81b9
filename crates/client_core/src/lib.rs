use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::GameStatus,
    error::ApiException,
    protocol::{guess_route, new_game_route, GuessRequest, GuessResponse, NewGameResponse},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

pub mod error;
pub mod session;
pub mod view;

pub use error::{GameError, GameErrorContext, GameErrorKind};
pub use session::{derive_status, normalize_guess, SessionSnapshot};

use session::Session;

/// The remote game service. All game rules live behind this seam.
#[async_trait]
pub trait GameService: Send + Sync {
    async fn new_game(&self) -> Result<NewGameResponse, ApiException>;
    async fn submit_guess(&self, request: GuessRequest) -> Result<GuessResponse, ApiException>;
}

pub struct HttpGameService {
    http: Client,
    server_url: String,
}

impl HttpGameService {
    pub fn new(server_url: &str) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(server_url.trim())?;
        Ok(Self {
            http: Client::new(),
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiException> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiException::from_status(status.as_u16(), &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiException::malformed(format!("invalid response from game service: {e}")))
}

fn transport_error(err: reqwest::Error) -> ApiException {
    ApiException::transport(format!("failed to reach game service: {err}"))
}

#[async_trait]
impl GameService for HttpGameService {
    async fn new_game(&self) -> Result<NewGameResponse, ApiException> {
        let response = self
            .http
            .post(format!("{}{}", self.server_url, new_game_route()))
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }

    async fn submit_guess(&self, request: GuessRequest) -> Result<GuessResponse, ApiException> {
        let response = self
            .http
            .post(format!("{}{}", self.server_url, guess_route()))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessRejection {
    InvalidInput,
    NotPlaying,
    AlreadyUsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// A precondition failed; nothing was sent.
    Ignored(GuessRejection),
    Applied(SessionSnapshot),
    /// The session was replaced while the guess was in flight; the response was dropped.
    Stale,
}

/// Owns the single game session and reconciles it with the game service.
///
/// State only changes once a remote response has been fully received. The lock is never held
/// across a remote call, so `snapshot` and `is_busy` stay responsive while one is outstanding.
pub struct GameSessionController {
    service: Arc<dyn GameService>,
    inner: Mutex<Session>,
}

impl GameSessionController {
    pub fn new(service: Arc<dyn GameService>) -> Arc<Self> {
        Arc::new(Self {
            service,
            inner: Mutex::new(Session::default()),
        })
    }

    pub fn connect(server_url: &str) -> Result<Arc<Self>, url::ParseError> {
        Ok(Self::new(Arc::new(HttpGameService::new(server_url)?)))
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn is_busy(&self) -> bool {
        self.inner.lock().await.busy
    }

    pub async fn start(&self) -> Result<SessionSnapshot, GameError> {
        {
            let mut guard = self.inner.lock().await;
            guard.last_error = None;
            guard.busy = true;
        }

        let result = self.service.new_game().await;

        let mut guard = self.inner.lock().await;
        guard.busy = false;
        match result {
            Ok(game) => {
                info!(
                    session_id = %game.id,
                    board = %game.current,
                    guesses_remaining = game.guesses_remaining,
                    "game: started"
                );
                guard.begin(game);
                Ok(guard.snapshot())
            }
            Err(err) => {
                let err = GameError::from_api(GameErrorContext::Start, err);
                warn!(status = ?err.status(), error = %err, "game: start failed");
                guard.reset_to_idle();
                guard.last_error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    pub async fn submit_guess(&self, candidate: &str) -> Result<GuessOutcome, GameError> {
        let Some(letter) = normalize_guess(candidate) else {
            debug!(input = candidate, "game: ignoring invalid guess input");
            return Ok(GuessOutcome::Ignored(GuessRejection::InvalidInput));
        };

        let session_id = {
            let mut guard = self.inner.lock().await;
            if guard.status != GameStatus::Playing {
                debug!(%letter, status = ?guard.status, "game: ignoring guess outside play");
                return Ok(GuessOutcome::Ignored(GuessRejection::NotPlaying));
            }
            if guard.used_letters.contains(&letter) {
                debug!(%letter, "game: ignoring repeated guess");
                return Ok(GuessOutcome::Ignored(GuessRejection::AlreadyUsed));
            }
            let Some(session_id) = guard.session_id.clone() else {
                return Ok(GuessOutcome::Ignored(GuessRejection::NotPlaying));
            };
            guard.last_error = None;
            guard.busy = true;
            session_id
        };

        let result = self
            .service
            .submit_guess(GuessRequest {
                id: session_id.clone(),
                guess: letter.to_string(),
            })
            .await;

        let mut guard = self.inner.lock().await;
        guard.busy = false;
        if guard.session_id.as_ref() != Some(&session_id) {
            warn!(
                session_id = %session_id,
                %letter,
                "game: dropping guess response for a replaced session"
            );
            return Ok(GuessOutcome::Stale);
        }

        match result {
            Ok(response) => {
                let status = guard.apply_guess(letter, response);
                info!(
                    %letter,
                    board = %guard.board,
                    guesses_remaining = guard.attempts_remaining,
                    ?status,
                    "game: guess accepted"
                );
                Ok(GuessOutcome::Applied(guard.snapshot()))
            }
            Err(err) => {
                let err = GameError::from_api(GameErrorContext::Guess, err);
                if err.is_session_gone() {
                    warn!(session_id = %session_id, "game: session no longer exists on server");
                    guard.reset_to_idle();
                } else {
                    warn!(status = ?err.status(), error = %err, %letter, "game: guess failed");
                }
                guard.last_error = Some(err.message().to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/http_service_tests.rs"]
mod http_service_tests;
