use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gomoku_qlearn::config::AppConfig;
use gomoku_qlearn::service::GomokuService;

/// Train the black and white Gomoku Q-tables via self-play.
#[derive(Parser)]
#[command(name = "train", about = "Train Gomoku Q-learning agents via self-play")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "gomoku.toml")]
    config: PathBuf,

    /// Override number of self-play games
    #[arg(long)]
    games: Option<usize>,

    /// Seed both agents for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Override board size
    #[arg(long)]
    board_size: Option<usize>,

    /// Suppress per-game progress output
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(games) = cli.games {
        app_config.training.games_to_play = games;
    }
    if let Some(seed) = cli.seed {
        app_config.training.seed = Some(seed);
    }
    if let Some(size) = cli.board_size {
        app_config.training.set_board_size(size);
    }
    app_config.validate().context("invalid configuration")?;

    let mut service = GomokuService::new(app_config);
    if cli.quiet {
        service = service.quiet();
    }

    let summary = service.trigger_training().context("training failed")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
