use std::collections::VecDeque;

use game_review::shakmaty::fen::Fen;
use game_review::shakmaty::{Chess, EnPassantMode};
use game_review::{EvaluationOracle, EvaluationResult, ReviewError};

/// Deterministic oracle: answers queries from a script in call order and
/// records what it was asked.
#[derive(Default)]
pub struct ScriptedOracle {
    pub script: VecDeque<EvaluationResult>,
    /// (FEN, depth) of every successful query
    pub calls: Vec<(String, u32)>,
    /// Zero-based query index that fails with `OracleUnavailable`
    pub fail_at: Option<usize>,
    pub shut_down: bool,
}

impl ScriptedOracle {
    pub fn new(script: Vec<EvaluationResult>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Script from `(pre, post)` pairs, one per move.
    pub fn per_move(moves: Vec<(EvaluationResult, EvaluationResult)>) -> Self {
        Self::new(
            moves
                .into_iter()
                .flat_map(|(pre, post)| [pre, post])
                .collect(),
        )
    }
}

impl EvaluationOracle for ScriptedOracle {
    async fn evaluate(&mut self, pos: &Chess, depth: u32) -> Result<EvaluationResult, ReviewError> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(ReviewError::OracleUnavailable("scripted failure".into()));
        }
        let fen = Fen::from_position(pos, EnPassantMode::Legal).to_string();
        self.calls.push((fen, depth));
        Ok(self.script.pop_front().unwrap_or_default())
    }

    async fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

/// Evaluation with a White-perspective score and a principal line.
pub fn eval(score: i32, pv: &[&str]) -> EvaluationResult {
    EvaluationResult {
        score,
        pv: pv.iter().map(|m| m.to_string()).collect(),
    }
}
