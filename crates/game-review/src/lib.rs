pub use shakmaty;

pub mod accuracy;
pub mod analyzer;
pub mod board;
pub mod classify;
pub mod config;
pub mod error;
pub mod opening;
pub mod oracle;
pub mod stockfish;
pub mod win_chance;

pub use analyzer::{analyze_pgn, run_session, GameAnalysis, MoveAnnotation};
pub use classify::Category;
pub use config::ReviewConfig;
pub use error::ReviewError;
pub use opening::OpeningBook;
pub use oracle::{EvaluationOracle, EvaluationResult};
