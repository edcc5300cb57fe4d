//! `habits` binary
//!
//! Interactive habit tracker. Reads one command per line from stdin; type
//! `help` for the list of commands. Nothing is saved between runs.

use anyhow::Context;
use habits::cli::{Reply, Session};
use habits::config::{Config, DEFAULT_LOG_FILTER};
use habits::{new_app_store, AppEnvironment, HabitListController};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("failed to load configuration")?;

    // Initialize tracing (stderr keeps the list output clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(?config, "Starting habits");

    let store = new_app_store(AppEnvironment::production(), &config);
    let mut session = Session::new(HabitListController::for_store(store.clone()));

    println!("Habits: type `help` for commands, `quit` to leave.\n");
    println!("{}", session.render().await);
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        match session.handle_line(&line).await? {
            Reply::Output(text) if text.is_empty() => {},
            Reply::Output(text) => println!("{text}"),
            Reply::Quit => break,
        }
        prompt()?;
    }

    store
        .shutdown(config.shutdown_timeout())
        .await
        .context("store did not shut down cleanly")?;

    tracing::info!("Goodbye");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}
