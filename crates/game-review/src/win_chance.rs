//! Centipawn → win probability conversion (pure functions only)

/// Decay constant of the logistic, fitted on rated online games.
pub const DEFAULT_K: f64 = 0.00368208;

/// Scores beyond this magnitude are treated as decided.
pub const SCORE_CLAMP: i32 = 1000;

/// Win probability curve with a configurable decay constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinChanceModel {
    pub k: f64,
}

impl Default for WinChanceModel {
    fn default() -> Self {
        Self { k: DEFAULT_K }
    }
}

impl WinChanceModel {
    pub fn new(k: f64) -> Self {
        Self { k }
    }

    /// Win probability in percentage points, 0..=100.
    /// A missing score means even chances.
    pub fn win_chance(&self, score: Option<i32>) -> f64 {
        let Some(cp) = score else {
            return 50.0;
        };
        let cp = cp.clamp(-SCORE_CLAMP, SCORE_CLAMP) as f64;
        50.0 + 50.0 * (2.0 / (1.0 + (-self.k * cp).exp()) - 1.0)
    }

    /// Win probability for `mover`, given a score from White's perspective.
    pub fn win_chance_for(&self, white_score: i32, mover_is_white: bool) -> f64 {
        let score = if mover_is_white {
            white_score
        } else {
            -white_score
        };
        self.win_chance(Some(score))
    }
}

/// [`WinChanceModel::win_chance`] with the default decay constant.
pub fn win_chance(score: Option<i32>) -> f64 {
    WinChanceModel::default().win_chance(score)
}
