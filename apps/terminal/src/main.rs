use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{view::GameView, GameSessionController};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod render;

use config::load_settings;
use input::{parse_command, Command, HELP};

#[derive(Parser, Debug)]
#[command(name = "wordgame", about = "Play the word-guessing game in a terminal")]
struct Args {
    #[arg(long, default_value = "wordgame.toml")]
    config: PathBuf,
    /// Base URL of the game service, e.g. http://127.0.0.1:8080/api
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    no_auto_start: bool,
}

async fn show(controller: &GameSessionController) {
    let snapshot = controller.snapshot().await;
    println!("\n{}", render::render(&GameView::from_snapshot(&snapshot)));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if args.no_auto_start {
        settings.auto_start = false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let controller = GameSessionController::connect(&settings.server_url)
        .with_context(|| format!("invalid game service url '{}'", settings.server_url))?;
    info!(server_url = %settings.server_url, "terminal: ready");

    if settings.auto_start {
        if let Err(err) = controller.start().await {
            debug!(error = %err, "terminal: auto start failed");
        }
    }
    show(&controller).await;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Help | Command::Unknown(_) => {
                println!("{HELP}");
                continue;
            }
            Command::NewGame => {
                if let Err(err) = controller.start().await {
                    debug!(error = %err, "terminal: start failed");
                }
            }
            Command::Guess(raw) => match controller.submit_guess(&raw).await {
                Ok(outcome) => debug!(?outcome, "terminal: guess handled"),
                Err(err) => debug!(error = %err, "terminal: guess failed"),
            },
        }
        show(&controller).await;
    }

    Ok(())
}
