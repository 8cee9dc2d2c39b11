//! Review configuration from environment variables

use std::env;
use std::path::PathBuf;

use crate::error::ReviewError;
use crate::win_chance::DEFAULT_K;

#[derive(Clone, Debug)]
pub struct ReviewConfig {
    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Search depth for the position before each move
    pub depth_before: u32,

    /// Search depth for the position after each move
    pub depth_after: u32,

    /// Opening reference table (CSV: id, name, moves)
    pub openings_path: PathBuf,

    /// Centipawn magnitude a forced mate is mapped to
    pub mate_score: i32,

    /// Decay constant of the win-chance logistic
    pub win_chance_k: f64,

    /// Number of principal-line moves kept per annotation
    pub pv_preview_len: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            stockfish_path: "/usr/local/bin/stockfish".to_string(),
            depth_before: 14,
            depth_after: 12,
            openings_path: PathBuf::from("data/openings_master.csv"),
            mate_score: 2000,
            win_chance_k: DEFAULT_K,
            pv_preview_len: 5,
        }
    }
}

impl ReviewConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ReviewError> {
        let defaults = Self::default();

        let stockfish_path = env::var("STOCKFISH_PATH").unwrap_or(defaults.stockfish_path);

        let depth_before = env::var("DEPTH_BEFORE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.depth_before);

        let depth_after = env::var("DEPTH_AFTER")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.depth_after);

        let openings_path = env::var("OPENINGS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.openings_path);

        let config = Self {
            stockfish_path,
            depth_before,
            depth_after,
            openings_path,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// The pre-move search must be strictly deeper than the post-move one.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.depth_after == 0 {
            return Err(ReviewError::Config("depth_after must be at least 1"));
        }
        if self.depth_before <= self.depth_after {
            return Err(ReviewError::Config(
                "depth_before must be greater than depth_after",
            ));
        }
        if self.mate_score <= 0 {
            return Err(ReviewError::Config("mate_score must be positive"));
        }
        Ok(())
    }
}
