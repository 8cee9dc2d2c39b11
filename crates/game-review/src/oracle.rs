//! Evaluation oracle interface consumed by the review loop.

use shakmaty::{Chess, Color, Position};

use crate::error::ReviewError;

/// Raw engine score, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawScore {
    Cp(i32),
    /// Mate in N (positive = side to move mates, 0 or negative = gets mated)
    Mate(i32),
}

impl RawScore {
    /// Centipawns from the side to move, with mates mapped to
    /// `±(mate_score - distance)`. `Mate(0)` means the side to move is mated.
    pub fn to_cp(self, mate_score: i32) -> i32 {
        match self {
            RawScore::Cp(cp) => cp,
            RawScore::Mate(n) if n > 0 => mate_score - n,
            RawScore::Mate(n) => -mate_score - n,
        }
    }

    /// Centipawns from White's perspective.
    pub fn to_white_cp(self, turn: Color, mate_score: i32) -> i32 {
        let cp = self.to_cp(mate_score);
        match turn {
            Color::White => cp,
            Color::Black => -cp,
        }
    }
}

/// Result of a single position evaluation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationResult {
    /// Centipawn score from White's perspective, mates clipped
    pub score: i32,
    /// Principal variation in UCI notation
    pub pv: Vec<String>,
}

impl EvaluationResult {
    /// Build from a side-to-move score as reported by the engine.
    pub fn from_raw(pos: &Chess, raw: Option<RawScore>, pv: Vec<String>, mate_score: i32) -> Self {
        let score = raw
            .map(|r| r.to_white_cp(pos.turn(), mate_score))
            .unwrap_or(0);
        Self { score, pv }
    }

    /// The oracle's preferred move: head of the principal line.
    pub fn best_move(&self) -> Option<&str> {
        self.pv.first().map(String::as_str)
    }
}

/// Anything that can search a position to a fixed depth.
///
/// Implemented by the Stockfish UCI wrapper and by scripted oracles in tests.
#[allow(async_fn_in_trait)]
pub trait EvaluationOracle {
    async fn evaluate(&mut self, pos: &Chess, depth: u32) -> Result<EvaluationResult, ReviewError>;

    /// Release the underlying resource. Called once at the end of a session.
    async fn shutdown(&mut self) {}
}
