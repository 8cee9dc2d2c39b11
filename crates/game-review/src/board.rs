//! Board state tracking for the review loop.
//!
//! Wraps a single mutable `shakmaty::Chess` position that is advanced one
//! legal move at a time. Material is recomputed from the board on request.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position, Role};

use crate::error::ReviewError;

// Piece values for material calculation
pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;

/// Piece value (no king)
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => 0,
    }
}

/// Material of both sides at one point in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Material {
    pub white: i32,
    pub black: i32,
}

impl Material {
    pub fn of(&self, color: Color) -> i32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

pub struct BoardTracker {
    pos: Chess,
    ply: usize,
}

impl Default for BoardTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardTracker {
    /// Start from the standard initial position.
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    pub fn from_position(pos: Chess) -> Self {
        Self { pos, ply: 0 }
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    /// Owned copy of the current position.
    pub fn snapshot(&self) -> Chess {
        self.pos.clone()
    }

    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    /// Number of moves applied so far.
    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    pub fn ensure_legal(&self, mv: &Move) -> Result<(), ReviewError> {
        if self.pos.is_legal(mv.clone()) {
            Ok(())
        } else {
            Err(ReviewError::IllegalMove {
                ply: self.ply + 1,
                mv: self.uci_of(mv),
            })
        }
    }

    /// Play `mv` in place. The position is untouched when the move is illegal.
    pub fn apply(&mut self, mv: &Move) -> Result<(), ReviewError> {
        self.ensure_legal(mv)?;
        self.pos.play_unchecked(mv.clone());
        self.ply += 1;
        Ok(())
    }

    /// Sum of piece values for `color`, scanned from the board.
    pub fn material_of(&self, color: Color) -> i32 {
        let board = self.pos.board();
        let side = board.by_color(color);
        Role::ALL
            .iter()
            .map(|&role| (side & board.by_role(role)).count() as i32 * piece_value(role))
            .sum()
    }

    pub fn material(&self) -> Material {
        Material {
            white: self.material_of(Color::White),
            black: self.material_of(Color::Black),
        }
    }

    /// SAN of `mv` relative to the current (pre-move) position, with check suffix.
    pub fn notation_of(&self, mv: &Move) -> String {
        SanPlus::from_move(self.pos.clone(), mv.clone()).to_string()
    }

    /// Long algebraic (UCI) form of `mv`.
    pub fn uci_of(&self, mv: &Move) -> String {
        mv.to_uci(CastlingMode::Standard).to_string()
    }
}
