//! Game review CLI
//!
//! Reads one finished game as PGN, reviews it with a local Stockfish and
//! prints the annotated result as JSON.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use game_review::{analyze_pgn, OpeningBook, ReviewConfig};

#[derive(Parser, Debug)]
#[command(name = "game-review", about = "Annotate every move of a finished chess game")]
struct Args {
    /// PGN file to review, or `-` for stdin
    pgn: String,

    /// Path to the Stockfish binary (overrides STOCKFISH_PATH)
    #[arg(long)]
    stockfish: Option<String>,

    /// Search depth before each move (overrides DEPTH_BEFORE)
    #[arg(long)]
    depth_before: Option<u32>,

    /// Search depth after each move (overrides DEPTH_AFTER)
    #[arg(long)]
    depth_after: Option<u32>,

    /// Opening reference CSV (overrides OPENINGS_FILE)
    #[arg(long)]
    openings: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn read_pgn(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read PGN from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so stdout stays valid JSON)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut config = ReviewConfig::from_env()?;
    if let Some(path) = args.stockfish {
        config.stockfish_path = path;
    }
    if let Some(depth) = args.depth_before {
        config.depth_before = depth;
    }
    if let Some(depth) = args.depth_after {
        config.depth_after = depth;
    }
    if let Some(path) = args.openings {
        config.openings_path = path;
    }
    config.validate()?;

    info!(
        stockfish_path = %config.stockfish_path,
        depth_before = config.depth_before,
        depth_after = config.depth_after,
        "Review config loaded"
    );

    let book = OpeningBook::load_or_empty(&config.openings_path);
    let pgn = read_pgn(&args.pgn)?;

    let analysis = analyze_pgn(&config, &book, &pgn).await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&analysis)?
    } else {
        serde_json::to_string(&analysis)?
    };
    println!("{json}");

    Ok(())
}
