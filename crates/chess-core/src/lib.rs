//! Game records shared by the review pipeline: PGN headers, movetext
//! tokenizing and SAN resolution against the standard start position.

pub mod game_data;
pub mod pgn;

pub use game_data::{GameData, GameMetadata};
pub use pgn::{parse_pgn, PgnError};
