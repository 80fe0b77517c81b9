use super::*;
use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use shared::{
    domain::{Board, SessionId},
    error::ErrorCode,
};
use tokio::net::TcpListener;

const STARTING_GUESSES: u32 = 6;

struct FakeGame {
    word: Vec<char>,
    current: Vec<char>,
    remaining: u32,
}

#[derive(Default)]
struct FakeRemoteState {
    games: HashMap<String, FakeGame>,
    next_id: u64,
}

#[derive(Clone)]
struct FakeRemote {
    word: &'static str,
    state: Arc<Mutex<FakeRemoteState>>,
}

type HandlerResult<T> = std::result::Result<Json<T>, (StatusCode, String)>;

async fn handle_new(State(remote): State<FakeRemote>) -> HandlerResult<NewGameResponse> {
    let mut state = remote.state.lock().await;
    state.next_id += 1;
    let id = format!("game-{:016x}", state.next_id);
    let word: Vec<char> = remote.word.to_uppercase().chars().collect();
    let current = vec!['_'; word.len()];
    let response = NewGameResponse {
        id: SessionId::new(id.clone()),
        current: Board::new(current.iter().collect::<String>()),
        guesses_remaining: STARTING_GUESSES,
    };
    state.games.insert(
        id,
        FakeGame {
            word,
            current,
            remaining: STARTING_GUESSES,
        },
    );
    Ok(Json(response))
}

async fn handle_guess(
    State(remote): State<FakeRemote>,
    Json(request): Json<GuessRequest>,
) -> HandlerResult<GuessResponse> {
    let guess = request.guess.trim().to_uppercase();
    let mut chars = guess.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => c,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "guess must be a single ASCII character [A-Z]\n".to_string(),
            ))
        }
    };

    let mut state = remote.state.lock().await;
    let id = request.id.as_str().to_string();
    let Some(game) = state.games.get_mut(&id) else {
        return Err((StatusCode::NOT_FOUND, "game not found\n".to_string()));
    };

    let mut found = false;
    for (slot, expected) in game.current.iter_mut().zip(&game.word) {
        if *expected == letter {
            *slot = letter;
            found = true;
        }
    }
    if !found {
        game.remaining = game.remaining.saturating_sub(1);
    }

    let response = GuessResponse {
        id: Some(request.id.clone()),
        current: Board::new(game.current.iter().collect::<String>()),
        guesses_remaining: game.remaining,
    };
    if game.current == game.word || game.remaining == 0 {
        state.games.remove(&id);
    }
    Ok(Json(response))
}

async fn spawn_router(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api")
}

async fn spawn_game_server(word: &'static str) -> (String, FakeRemote) {
    let remote = FakeRemote {
        word,
        state: Arc::new(Mutex::new(FakeRemoteState::default())),
    };
    let routes = Router::new()
        .route("/new", post(handle_new))
        .route("/guess", post(handle_guess))
        .with_state(remote.clone());
    let server_url = spawn_router(Router::new().nest("/api", routes)).await;
    (server_url, remote)
}

#[tokio::test]
async fn plays_a_full_game_to_a_win_over_http() {
    let (server_url, _remote) = spawn_game_server("apple").await;
    let controller = GameSessionController::connect(&server_url).expect("controller");

    let snapshot = controller.start().await.expect("start");
    assert_eq!(snapshot.board.as_str(), "_____");
    assert_eq!(snapshot.attempts_remaining, STARTING_GUESSES);

    controller.submit_guess("p").await.expect("p");
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.board.as_str(), "_PP__");
    assert_eq!(snapshot.attempts_remaining, STARTING_GUESSES);
    assert_eq!(snapshot.status, GameStatus::Playing);

    controller.submit_guess("z").await.expect("z");
    assert_eq!(controller.snapshot().await.attempts_remaining, 5);

    for c in ["a", "l", "e"] {
        controller.submit_guess(c).await.expect("guess");
    }
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.board.as_str(), "APPLE");
    assert_eq!(snapshot.status, GameStatus::Won);
    assert_eq!(snapshot.used_letters.len(), 5);
}

#[tokio::test]
async fn runs_out_of_attempts_over_http() {
    let (server_url, _remote) = spawn_game_server("a").await;
    let controller = GameSessionController::connect(&server_url).expect("controller");
    controller.start().await.expect("start");

    for c in ["b", "c", "d", "e", "f", "g"] {
        controller.submit_guess(c).await.expect("guess");
    }

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.status, GameStatus::Lost);
    assert_eq!(snapshot.attempts_remaining, 0);
    assert_eq!(snapshot.board.as_str(), "_");
}

#[tokio::test]
async fn guess_for_discarded_session_resets_to_idle() {
    let (server_url, remote) = spawn_game_server("apple").await;
    let controller = GameSessionController::connect(&server_url).expect("controller");
    controller.start().await.expect("start");

    remote.state.lock().await.games.clear();

    let err = controller.submit_guess("a").await.expect_err("must fail");
    assert!(err.is_session_gone());
    assert_eq!(err.status(), Some(404));

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.status, GameStatus::Idle);
    assert_eq!(snapshot.session_id, None);
    assert_eq!(snapshot.last_error.as_deref(), Some("game not found"));

    controller.start().await.expect("restart");
    assert_eq!(controller.snapshot().await.status, GameStatus::Playing);
}

#[tokio::test]
async fn finished_game_is_gone_for_late_guesses() {
    let (server_url, _remote) = spawn_game_server("a").await;
    let service = HttpGameService::new(&server_url).expect("service");

    let game = service.new_game().await.expect("new game");
    let won = service
        .submit_guess(GuessRequest {
            id: game.id.clone(),
            guess: "A".to_string(),
        })
        .await
        .expect("winning guess");
    assert_eq!(won.current.as_str(), "A");
    assert_eq!(won.id, Some(game.id.clone()));

    let late = service
        .submit_guess(GuessRequest {
            id: game.id,
            guess: "B".to_string(),
        })
        .await
        .expect_err("late guess");
    assert!(late.is_not_found());
    assert_eq!(late.message, "game not found");
}

#[tokio::test]
async fn rejected_guess_body_becomes_the_message() {
    let (server_url, _remote) = spawn_game_server("apple").await;
    let service = HttpGameService::new(&server_url).expect("service");
    let game = service.new_game().await.expect("new game");

    let err = service
        .submit_guess(GuessRequest {
            id: game.id,
            guess: "12".to_string(),
        })
        .await
        .expect_err("invalid guess");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, "guess must be a single ASCII character [A-Z]");
}

#[tokio::test]
async fn start_failure_without_body_reports_status_line() {
    let app = Router::new().route(
        "/api/new",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let server_url = spawn_router(app).await;
    let controller = GameSessionController::connect(&server_url).expect("controller");

    let err = controller.start().await.expect_err("must fail");
    assert_eq!(err.message(), "HTTP 503");
    assert_eq!(err.kind(), GameErrorKind::Transport);
    assert_eq!(controller.snapshot().await.status, GameStatus::Idle);
}

#[tokio::test]
async fn undecodable_success_body_is_a_malformed_response() {
    let app = Router::new().route("/api/new", post(|| async { "not json" }));
    let server_url = spawn_router(app).await;
    let service = HttpGameService::new(&server_url).expect("service");

    let err = service.new_game().await.expect_err("must fail");
    assert_eq!(err.code, ErrorCode::MalformedResponse);
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let service = HttpGameService::new(&format!("http://{addr}")).expect("service");
    let err = service.new_game().await.expect_err("must fail");
    assert_eq!(err.code, ErrorCode::Transport);
    assert!(err.message.starts_with("failed to reach game service"));
}

#[test]
fn server_url_is_validated_and_normalized() {
    assert!(HttpGameService::new("not a url").is_err());
    let service = HttpGameService::new(" http://127.0.0.1:8080/api/ ").expect("service");
    assert_eq!(service.server_url(), "http://127.0.0.1:8080/api");
    let bare = HttpGameService::new("http://localhost:9000").expect("service");
    assert_eq!(bare.server_url(), "http://localhost:9000");
}
