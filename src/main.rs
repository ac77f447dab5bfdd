use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gomoku_qlearn::config::AppConfig;
use gomoku_qlearn::game::Player;
use gomoku_qlearn::service::{parse_grid, GomokuService};

/// Ask a trained table for its move on a given board.
#[derive(Parser)]
#[command(name = "gomoku-qlearn", about = "Pick a move from a trained Gomoku Q-table")]
struct Cli {
    /// Color to move: black or white
    #[arg(long, default_value = "black")]
    color: Player,

    /// JSON board file (rows of null, "black", "white"); read from stdin when omitted
    #[arg(long)]
    board: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "gomoku.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let json = match &cli.board {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading board from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading board from stdin")?;
            buf
        }
    };
    let grid = if json.trim().is_empty() {
        None
    } else {
        Some(parse_grid(&json)?)
    };

    let service = GomokuService::new(app_config);
    let mv = service
        .trained_move(cli.color, grid.as_deref())
        .with_context(|| format!("choosing a move for {}", cli.color))?;
    println!("{}", serde_json::to_string(&mv)?);
    Ok(())
}
