use serde::{Deserialize, Serialize};
use shakmaty::san::SanPlus;
use shakmaty::{Chess, Move, Position};

use crate::pgn::PgnError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>, // "1-0", "0-1", "1/2-1/2", "*"
    pub date: Option<String>,
    pub eco: Option<String>,
    pub event: Option<String>,
}

/// A finished game as read from PGN: headers plus mainline SAN tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub metadata: GameMetadata,
    pub san_moves: Vec<String>,
}

impl GameData {
    /// Resolve every SAN token against the standard start position.
    ///
    /// Fails on the first token that is not a legal move in the position
    /// reached so far, so callers never see a partial sequence.
    pub fn legal_moves(&self) -> Result<Vec<Move>, PgnError> {
        let mut pos = Chess::default();
        let mut moves = Vec::with_capacity(self.san_moves.len());

        for (ply, token) in self.san_moves.iter().enumerate() {
            let san: SanPlus = token.parse().map_err(|_| PgnError::BadSan {
                ply: ply + 1,
                san: token.clone(),
            })?;
            let mv = san.san.to_move(&pos).map_err(|_| PgnError::Illegal {
                ply: ply + 1,
                san: token.clone(),
            })?;
            pos.play_unchecked(mv.clone());
            moves.push(mv);
        }

        Ok(moves)
    }
}
