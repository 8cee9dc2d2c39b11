//! Opening reference table and in-game book tracking.
//!
//! The reference is a CSV table of `(id, name, moves)` rows in priority
//! order, loaded once and shared read-only between sessions. A game stays
//! "in book" while its movetext so far is a prefix of some entry's moves.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::error::ReviewError;

/// Opening name reported until an entry matches.
pub const DEFAULT_OPENING_NAME: &str = "Unidentified opening";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningEntry {
    pub name: String,
    /// Canonical movetext, e.g. `1. e4 c5 2. Nf3 d6`
    pub moves: String,
}

/// All known openings in file order. Earlier entries win ties.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: Vec<OpeningEntry>,
}

impl OpeningBook {
    pub fn new(entries: Vec<OpeningEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the table from a CSV file with a header row.
    /// Rows with fewer than three columns are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReviewError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path.as_ref())
            .map_err(|e| ReviewError::OpeningReference(e.to_string()))?;
        Self::from_csv_reader(reader)
    }

    /// Parse CSV text with a header row (same format as [`OpeningBook::load`]).
    pub fn from_csv_str(data: &str) -> Result<Self, ReviewError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes());
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, ReviewError> {
        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ReviewError::OpeningReference(e.to_string()))?;
            if record.len() < 3 {
                continue;
            }
            entries.push(OpeningEntry {
                name: record[1].trim().to_string(),
                moves: record[2].trim().to_string(),
            });
        }
        Ok(Self::new(entries))
    }

    /// Load the table, degrading to an empty reference on failure.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(book) => {
                tracing::info!(entries = book.len(), path = %path.display(), "Loaded opening reference");
                book
            }
            Err(e) => {
                tracing::warn!("Failed to load opening reference from {}: {}", path.display(), e);
                tracing::warn!("Every game will be treated as out of book");
                Self::empty()
            }
        }
    }

    /// First entry (in priority order) whose moves start with `prefix`.
    pub fn find_prefix(&self, prefix: &str) -> Option<&OpeningEntry> {
        self.entries.iter().find(|entry| entry.moves.starts_with(prefix))
    }
}

/// Per-game book status. Once out of book, the matcher stops looking.
#[derive(Debug, Clone)]
pub struct OpeningMatcher {
    in_book: bool,
    opening_name: String,
    moves_so_far: String,
    move_number: u32,
}

impl Default for OpeningMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl OpeningMatcher {
    pub fn new() -> Self {
        Self {
            in_book: true,
            opening_name: DEFAULT_OPENING_NAME.to_string(),
            moves_so_far: String::new(),
            move_number: 1,
        }
    }

    pub fn in_book(&self) -> bool {
        self.in_book
    }

    pub fn opening_name(&self) -> &str {
        &self.opening_name
    }

    /// Movetext accumulated so far, e.g. `1. e4 e5 2. Nf3`.
    pub fn moves_so_far(&self) -> &str {
        &self.moves_so_far
    }

    /// Record one move (SAN, played by `mover`) and refresh the book status.
    pub fn record(&mut self, book: &OpeningBook, san: &str, mover: Color) {
        if !self.moves_so_far.is_empty() {
            self.moves_so_far.push(' ');
        }
        match mover {
            Color::White => {
                self.moves_so_far
                    .push_str(&format!("{}. {}", self.move_number, san));
            }
            Color::Black => {
                self.moves_so_far.push_str(san);
                self.move_number += 1;
            }
        }

        if !self.in_book {
            return;
        }

        match book.find_prefix(&self.moves_so_far) {
            Some(entry) => self.opening_name = entry.name.clone(),
            None => self.in_book = false,
        }
    }
}
