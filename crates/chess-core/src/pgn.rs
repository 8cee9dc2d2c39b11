//! PGN parsing utilities — lightweight regex-based parser.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::game_data::{GameData, GameMetadata};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("header regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}|;[^\n]*").expect("comment regex"));
static MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.+").expect("move number regex"));
static SAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=?[QRBN])?|O-O-O|O-O)[+#]?$")
        .expect("san regex")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    #[error("No movetext found")]
    Empty,

    #[error("Non-standard starting position: {0}")]
    NonStandardStart(String),

    #[error("Unparseable move '{san}' at ply {ply}")]
    BadSan { ply: usize, san: String },

    #[error("Illegal move '{san}' at ply {ply}")]
    Illegal { ply: usize, san: String },
}

/// Parse a PGN string (headers optional) into its metadata and mainline SAN moves.
///
/// Every movetext token must be a move number, a result marker, a NAG or a
/// SAN move; anything else is rejected rather than skipped.
pub fn parse_pgn(pgn: &str) -> Result<GameData, PgnError> {
    let mut metadata = GameMetadata::default();
    let mut setup = None;
    let mut fen = None;

    for cap in HEADER_RE.captures_iter(pgn) {
        let value = Some(cap[2].to_string());
        match &cap[1] {
            "White" => metadata.white = value,
            "Black" => metadata.black = value,
            "Result" => metadata.result = value,
            "Date" => metadata.date = value,
            "ECO" => metadata.eco = value,
            "Event" => metadata.event = value,
            "SetUp" => setup = value,
            "FEN" => fen = value,
            _ => {}
        }
    }

    if setup.as_deref() == Some("1") {
        if let Some(f) = fen {
            if f.trim() != STANDARD_START_FEN {
                return Err(PgnError::NonStandardStart(f));
            }
        }
    }

    let san_moves = extract_moves(pgn)?;
    if san_moves.is_empty() {
        return Err(PgnError::Empty);
    }

    Ok(GameData {
        metadata,
        san_moves,
    })
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Result<Vec<String>, PgnError> {
    let no_headers = HEADER_RE.replace_all(pgn, "");
    let no_comments = COMMENT_RE.replace_all(&no_headers, "");
    let movetext = strip_variations(&no_comments);

    let mut moves = Vec::new();
    for raw in movetext.split_whitespace() {
        let token = MOVE_NUMBER_RE.replace(raw, "");
        let token = token.trim_end_matches(['!', '?']);
        if token.is_empty() || token.starts_with('$') || is_result(token) {
            continue;
        }
        // Some exporters write castling with zeros.
        let token = token.replace('0', "O");
        if !SAN_RE.is_match(&token) {
            return Err(PgnError::BadSan {
                ply: moves.len() + 1,
                san: raw.to_string(),
            });
        }
        moves.push(token);
    }

    Ok(moves)
}

fn is_result(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

/// Drop parenthesised variations, including nested ones.
fn strip_variations(text: &str) -> String {
    let mut depth = 0usize;
    text.chars()
        .filter(|c| match c {
            '(' => {
                depth += 1;
                false
            }
            ')' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect()
}
