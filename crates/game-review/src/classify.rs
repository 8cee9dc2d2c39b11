//! Move classification — pure functions only
//! (No board, engine or book dependencies)

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::board::Material;
use crate::win_chance::WinChanceModel;

/// Win-chance loss thresholds (percentage points) for non-engine moves
const THRESHOLD_BEST: f64 = 2.0;
const THRESHOLD_EXCELLENT: f64 = 5.0;
const THRESHOLD_GOOD: f64 = 10.0;
const THRESHOLD_INACCURACY: f64 = 20.0;
const THRESHOLD_MISTAKE: f64 = 35.0;

/// A sacrifice must keep the mover above this win chance to be brilliant
const BRILLIANT_MIN_AFTER: f64 = 80.0;
const BRILLIANT_MAX_DELTA: f64 = 2.0;
const GREAT_MAX_DELTA: f64 = 1.0;

/// Accuracy points lost per point of win chance
const ACCURACY_PER_DELTA: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Brilliant,
    Great,
    Best,
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
    Book,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Brilliant => "brilliant",
            Category::Great => "great",
            Category::Best => "best",
            Category::Excellent => "excellent",
            Category::Good => "good",
            Category::Inaccuracy => "inaccuracy",
            Category::Mistake => "mistake",
            Category::Blunder => "blunder",
            Category::Book => "book",
        }
    }

    /// Outright errors are never excused by opening theory.
    pub fn is_error(&self) -> bool {
        matches!(self, Category::Mistake | Category::Blunder)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the classifier needs to know about one played move.
#[derive(Debug, Clone)]
pub struct MoveContext<'a> {
    pub played_uci: &'a str,
    pub best_uci: &'a str,
    /// White-perspective score before the move
    pub cp_before: i32,
    /// White-perspective score after the move
    pub cp_after: i32,
    pub mover: Color,
    pub material_before: Material,
    pub material_after: Material,
    pub in_book: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub category: Category,
    /// Mover's win chance before the move
    pub win_before: f64,
    /// Mover's win chance after the move
    pub win_after: f64,
    /// Win chance lost by the move (negative when it beat the estimate)
    pub delta: f64,
    pub accuracy: f64,
}

pub fn classify(model: &WinChanceModel, ctx: &MoveContext<'_>) -> Verdict {
    let is_white = ctx.mover == Color::White;
    let win_before = model.win_chance_for(ctx.cp_before, is_white);
    let win_after = model.win_chance_for(ctx.cp_after, is_white);
    let delta = win_before - win_after;

    let category = if ctx.played_uci == ctx.best_uci {
        // Only the mover's own loss counts; recaptures are not looked at.
        let sacrificed =
            ctx.material_before.of(ctx.mover) - ctx.material_after.of(ctx.mover) > 0;
        engine_move_category(sacrificed, win_before, win_after, delta)
    } else {
        category_for_delta(delta)
    };

    let category = if ctx.in_book && !category.is_error() {
        Category::Book
    } else {
        category
    };

    Verdict {
        category,
        win_before,
        win_after,
        delta,
        accuracy: move_accuracy(delta),
    }
}

/// Category for a move that matches the oracle's choice.
pub fn engine_move_category(sacrificed: bool, win_before: f64, win_after: f64, delta: f64) -> Category {
    if sacrificed && win_after > BRILLIANT_MIN_AFTER && delta < BRILLIANT_MAX_DELTA {
        Category::Brilliant
    } else if delta < GREAT_MAX_DELTA && win_before < 50.0 && win_after > 50.0 {
        Category::Great
    } else {
        Category::Best
    }
}

/// Category for a move other than the oracle's choice.
pub fn category_for_delta(delta: f64) -> Category {
    if delta <= THRESHOLD_BEST {
        Category::Best
    } else if delta <= THRESHOLD_EXCELLENT {
        Category::Excellent
    } else if delta <= THRESHOLD_GOOD {
        Category::Good
    } else if delta <= THRESHOLD_INACCURACY {
        Category::Inaccuracy
    } else if delta <= THRESHOLD_MISTAKE {
        Category::Mistake
    } else {
        Category::Blunder
    }
}

/// Per-move accuracy, floored at 0. A move that beats the pre-move estimate
/// scores above 100; only the per-side mean is capped.
pub fn move_accuracy(delta: f64) -> f64 {
    (100.0 - ACCURACY_PER_DELTA * delta).max(0.0)
}
