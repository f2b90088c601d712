use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use snake_progress::game::{GameConfig, Session};
use snake_progress::modes::PlayMode;
use snake_progress::persistence::JsonFileStore;

#[derive(Parser)]
#[command(name = "snake_progress")]
#[command(version, about = "Terminal snake with per-user saved progression")]
struct Cli {
    /// Player name; progression is saved under this identity
    username: String,

    /// Grid width
    #[arg(long, default_value = "30")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "30")]
    height: usize,

    /// Path to the JSON save file
    #[arg(long, default_value = "snake_saves.json")]
    store: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.username.trim().is_empty() {
        bail!("Username cannot be empty");
    }

    if cli.width < 2 || cli.height < 2 {
        bail!("Grid dimensions must be at least 2x2");
    }

    let config = GameConfig::new(cli.width, cli.height);
    let store = JsonFileStore::open(&cli.store)
        .with_context(|| format!("Failed to open save store {:?}", cli.store))?;

    // A failed load is unrecoverable: there is no fallback identity
    let session = Session::start(config, store, cli.username.trim())
        .context("Failed to load progression")?;

    println!(
        "Welcome, {}. Starting at level {} with score {}.",
        cli.username.trim(),
        session.state().level(),
        session.state().score(),
    );

    let mut play = PlayMode::new(session);
    play.run().await
}
