//! Review error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Evaluation oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Illegal move {mv} at ply {ply}")]
    IllegalMove { ply: usize, mv: String },

    #[error("Opening reference load failure: {0}")]
    OpeningReference(String),
}

impl From<chess_core::PgnError> for ReviewError {
    fn from(e: chess_core::PgnError) -> Self {
        ReviewError::InvalidInput(e.to_string())
    }
}
