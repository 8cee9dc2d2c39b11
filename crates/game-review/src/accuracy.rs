//! Per-side accuracy and category tallies.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::classify::Category;

/// Category counts for one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifications {
    pub brilliant: u32,
    pub great: u32,
    pub best: u32,
    pub excellent: u32,
    pub good: u32,
    pub inaccuracy: u32,
    pub mistake: u32,
    pub blunder: u32,
    pub book: u32,
}

impl Classifications {
    pub fn record(&mut self, category: Category) {
        let slot = match category {
            Category::Brilliant => &mut self.brilliant,
            Category::Great => &mut self.great,
            Category::Best => &mut self.best,
            Category::Excellent => &mut self.excellent,
            Category::Good => &mut self.good,
            Category::Inaccuracy => &mut self.inaccuracy,
            Category::Mistake => &mut self.mistake,
            Category::Blunder => &mut self.blunder,
            Category::Book => &mut self.book,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        self.brilliant
            + self.great
            + self.best
            + self.excellent
            + self.good
            + self.inaccuracy
            + self.mistake
            + self.blunder
            + self.book
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccuracyAggregator {
    white: Vec<f64>,
    black: Vec<f64>,
}

impl AccuracyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, side: Color, accuracy: f64) {
        match side {
            Color::White => self.white.push(accuracy),
            Color::Black => self.black.push(accuracy),
        }
    }

    pub fn moves_recorded(&self, side: Color) -> usize {
        self.values(side).len()
    }

    /// Rounded mean accuracy for `side`; 0 when the side never moved.
    pub fn accuracy(&self, side: Color) -> u32 {
        mean_accuracy(self.values(side))
    }

    fn values(&self, side: Color) -> &[f64] {
        match side {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

/// Mean of per-move accuracies, rounded half to even, in 0..=100.
pub fn mean_accuracy(values: &[f64]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    mean.clamp(0.0, 100.0).round_ties_even() as u32
}
