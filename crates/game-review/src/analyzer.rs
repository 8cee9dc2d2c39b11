//! Core game review logic
//!
//! One session per game: parse the movetext, acquire an oracle, then walk the
//! mainline evaluating each position before and after the move. The oracle is
//! released on every exit path of the move loop.

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Move};
use tracing::{debug, info};

use crate::accuracy::{AccuracyAggregator, Classifications};
use crate::board::BoardTracker;
use crate::classify::{classify, Category, MoveContext};
use crate::config::ReviewConfig;
use crate::error::ReviewError;
use crate::opening::{OpeningBook, OpeningMatcher};
use crate::oracle::EvaluationOracle;
use crate::stockfish::StockfishEngine;
use crate::win_chance::WinChanceModel;

/// Move output for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAnnotation {
    /// Position after the move
    pub fen: String,
    pub san: String,
    pub uci: String,
    /// White-perspective score before the move
    pub eval: i32,
    pub best_move: String,
    pub category: Category,
    pub opening: String,
    pub win_delta: f64,
    /// Per-move accuracy, floored at 0 (above 100 when the move beat the estimate)
    pub accuracy: f64,
    /// Head of the oracle's line from the pre-move position
    pub pv: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideAccuracy {
    pub w: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideClassifications {
    pub w: Classifications,
    pub b: Classifications,
}

impl SideClassifications {
    fn side_mut(&mut self, side: Color) -> &mut Classifications {
        match side {
            Color::White => &mut self.w,
            Color::Black => &mut self.b,
        }
    }
}

/// Full review result sent to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub moves: Vec<MoveAnnotation>,
    pub accuracy: SideAccuracy,
    pub opening: String,
    pub classifications: SideClassifications,
}

/// Parse PGN text into the legal mainline. Never touches an engine.
pub fn parse_movetext(pgn: &str) -> Result<Vec<Move>, ReviewError> {
    if pgn.trim().is_empty() {
        return Err(ReviewError::InvalidInput("No PGN".into()));
    }
    let game = chess_core::parse_pgn(pgn)?;
    Ok(game.legal_moves()?)
}

/// Review a PGN game with a freshly spawned Stockfish process.
pub async fn analyze_pgn(
    config: &ReviewConfig,
    book: &OpeningBook,
    pgn: &str,
) -> Result<GameAnalysis, ReviewError> {
    let moves = parse_movetext(pgn)?;
    info!(move_count = moves.len(), "Parsed movetext");

    let mut engine = StockfishEngine::new(&config.stockfish_path, config.mate_score).await?;
    run_session(&mut engine, config, book, &moves).await
}

/// Review `moves` with `oracle`, then shut the oracle down whatever the outcome.
pub async fn run_session<O: EvaluationOracle>(
    oracle: &mut O,
    config: &ReviewConfig,
    book: &OpeningBook,
    moves: &[Move],
) -> Result<GameAnalysis, ReviewError> {
    let result = review_moves(oracle, config, book, moves).await;
    oracle.shutdown().await;
    result
}

/// The per-move evaluation and classification loop.
pub async fn review_moves<O: EvaluationOracle>(
    oracle: &mut O,
    config: &ReviewConfig,
    book: &OpeningBook,
    moves: &[Move],
) -> Result<GameAnalysis, ReviewError> {
    info!(move_count = moves.len(), "Starting review");

    let model = WinChanceModel::new(config.win_chance_k);
    let mut tracker = BoardTracker::new();
    let mut matcher = OpeningMatcher::new();
    let mut aggregator = AccuracyAggregator::new();
    let mut classifications = SideClassifications::default();
    let mut annotations = Vec::with_capacity(moves.len());

    for mv in moves {
        tracker.ensure_legal(mv)?;

        let mover = tracker.turn();
        let san = tracker.notation_of(mv);
        let uci = tracker.uci_of(mv);
        matcher.record(book, &san, mover);

        // What should have been played
        let pre = tracker.snapshot();
        let before = oracle.evaluate(&pre, config.depth_before).await?;
        let best_move = before.best_move().unwrap_or(&uci).to_string();

        let material_before = tracker.material();
        tracker.apply(mv)?;
        let material_after = tracker.material();

        // What was obtained
        let post = tracker.snapshot();
        let after = oracle.evaluate(&post, config.depth_after).await?;

        let verdict = classify(
            &model,
            &MoveContext {
                played_uci: &uci,
                best_uci: &best_move,
                cp_before: before.score,
                cp_after: after.score,
                mover,
                material_before,
                material_after,
                in_book: matcher.in_book(),
            },
        );

        debug!(
            ply = tracker.ply(),
            san = %san,
            best = %best_move,
            cp_before = before.score,
            cp_after = after.score,
            delta = verdict.delta,
            category = %verdict.category,
            "Classified move"
        );

        aggregator.record(mover, verdict.accuracy);
        classifications.side_mut(mover).record(verdict.category);

        annotations.push(MoveAnnotation {
            fen: tracker.fen(),
            san,
            uci,
            eval: before.score,
            best_move,
            category: verdict.category,
            opening: matcher.opening_name().to_string(),
            win_delta: (verdict.delta * 10.0).round() / 10.0,
            accuracy: (verdict.accuracy * 10.0).round() / 10.0,
            pv: before
                .pv
                .iter()
                .take(config.pv_preview_len)
                .cloned()
                .collect(),
        });
    }

    let accuracy = SideAccuracy {
        w: aggregator.accuracy(Color::White),
        b: aggregator.accuracy(Color::Black),
    };
    info!(
        white_moves = aggregator.moves_recorded(Color::White),
        black_moves = aggregator.moves_recorded(Color::Black),
        white_accuracy = accuracy.w,
        black_accuracy = accuracy.b,
        classified = classifications.w.total() + classifications.b.total(),
        opening = matcher.opening_name(),
        "Review complete"
    );

    Ok(GameAnalysis {
        moves: annotations,
        accuracy,
        opening: matcher.opening_name().to_string(),
        classifications,
    })
}
