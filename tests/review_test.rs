//! Session-level tests: the full review loop against a scripted oracle.
//!
//! Scores in the scripts are from White's perspective, exactly as the
//! Stockfish wrapper reports them after normalization.

mod common;

use common::{eval, ScriptedOracle};
use game_review::analyzer::parse_movetext;
use game_review::opening::DEFAULT_OPENING_NAME;
use game_review::{analyze_pgn, run_session, Category, OpeningBook, ReviewConfig, ReviewError};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// 6... Nf6?? walks into mate; the script makes it lose ~95 points of win chance.
const BLUNDER_GAME: &str = "1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0";

fn blunder_script() -> ScriptedOracle {
    ScriptedOracle::per_move(vec![
        (eval(20, &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6"]), eval(20, &["e7e5"])),
        (eval(20, &["e7e5"]), eval(25, &["g1f3"])),
        (eval(25, &["g1f3"]), eval(0, &["b8c6"])),
        (eval(0, &["b8c6"]), eval(0, &["f1c4"])),
        (eval(0, &["f1c4"]), eval(0, &["g7g6"])),
        (eval(-1000, &["g7g6"]), eval(1999, &["h5f7"])),
        (eval(1999, &["h5f7"]), eval(2000, &[])),
    ])
}

fn parham_book() -> OpeningBook {
    OpeningBook::from_csv_str(
        "eco,name,moves
C20,King's Pawn Game,1. e4 e5
C20,Parham Attack,1. e4 e5 2. Qh5
B00,Nimzowitsch Defense,1. e4 Nc6
",
    )
    .unwrap()
}

#[tokio::test]
async fn test_blunder_is_flagged_with_zero_accuracy() {
    let config = ReviewConfig::default();
    let moves = parse_movetext(BLUNDER_GAME).unwrap();
    let mut oracle = blunder_script();

    let analysis = run_session(&mut oracle, &config, &OpeningBook::empty(), &moves)
        .await
        .unwrap();

    let categories: Vec<Category> = analysis.moves.iter().map(|m| m.category).collect();
    assert_eq!(
        categories,
        vec![
            Category::Best,
            Category::Best,
            Category::Excellent,
            Category::Best,
            Category::Best,
            Category::Blunder,
            Category::Best,
        ]
    );

    let blunder = &analysis.moves[5];
    assert_eq!(blunder.san, "Nf6");
    assert_eq!(blunder.uci, "g8f6");
    assert_eq!(blunder.best_move, "g7g6");
    assert_eq!(blunder.eval, -1000);
    assert!(blunder.win_delta > 35.0);
    assert_eq!(blunder.accuracy, 0.0);

    let mate = &analysis.moves[6];
    assert_eq!(mate.san, "Qxf7#");
    assert_eq!(mate.pv, vec!["h5f7"]);

    assert_eq!(analysis.accuracy.w, 99);
    assert_eq!(analysis.accuracy.b, 66);
    assert_eq!(analysis.classifications.b.blunder, 1);
    assert_eq!(analysis.classifications.w.total(), 4);
    assert_eq!(analysis.opening, DEFAULT_OPENING_NAME);
    assert!(oracle.shut_down);
}

#[tokio::test]
async fn test_pre_move_search_is_deeper_than_post_move() {
    let config = ReviewConfig::default();
    let moves = parse_movetext("1. e4 e5").unwrap();
    let mut oracle = ScriptedOracle::default();

    run_session(&mut oracle, &config, &OpeningBook::empty(), &moves)
        .await
        .unwrap();

    let depths: Vec<u32> = oracle.calls.iter().map(|(_, d)| *d).collect();
    assert_eq!(
        depths,
        vec![
            config.depth_before,
            config.depth_after,
            config.depth_before,
            config.depth_after
        ]
    );
    assert_eq!(oracle.calls[0].0, START_FEN);
    // Post-move position of ply 1 is the pre-move position of ply 2
    assert_eq!(oracle.calls[1].0, oracle.calls[2].0);
}

#[tokio::test]
async fn test_pv_preview_and_annotation_fields() {
    let config = ReviewConfig::default();
    let moves = parse_movetext(BLUNDER_GAME).unwrap();
    let mut oracle = blunder_script();

    let analysis = run_session(&mut oracle, &config, &OpeningBook::empty(), &moves)
        .await
        .unwrap();

    let first = &analysis.moves[0];
    assert_eq!(first.pv, vec!["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"]);
    assert_eq!(first.eval, 20);
    assert_eq!(
        first.fen,
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
    );
    assert_eq!(analysis.moves[2].win_delta, 2.3);
}

#[tokio::test]
async fn test_book_moves_and_final_opening() {
    let config = ReviewConfig::default();
    let moves = parse_movetext(BLUNDER_GAME).unwrap();
    let mut oracle = blunder_script();

    let analysis = run_session(&mut oracle, &config, &parham_book(), &moves)
        .await
        .unwrap();

    let categories: Vec<Category> = analysis.moves.iter().map(|m| m.category).collect();
    assert_eq!(&categories[..3], &[Category::Book; 3]);
    // 2... Nc6 is not a continuation of any entry: out of book for good
    assert_eq!(categories[3], Category::Best);
    assert_eq!(categories[5], Category::Blunder);

    assert_eq!(analysis.moves[0].opening, "King's Pawn Game");
    assert_eq!(analysis.moves[2].opening, "Parham Attack");
    assert_eq!(analysis.moves[6].opening, "Parham Attack");
    assert_eq!(analysis.opening, "Parham Attack");
    assert_eq!(analysis.classifications.w.book, 2);
    assert_eq!(analysis.classifications.b.book, 1);
}

#[tokio::test]
async fn test_missing_pv_falls_back_to_played_move() {
    let config = ReviewConfig::default();
    let moves = parse_movetext("1. d4").unwrap();
    let mut oracle = ScriptedOracle::per_move(vec![(eval(15, &[]), eval(15, &[]))]);

    let analysis = run_session(&mut oracle, &config, &OpeningBook::empty(), &moves)
        .await
        .unwrap();

    assert_eq!(analysis.moves[0].best_move, "d2d4");
    assert_eq!(analysis.moves[0].category, Category::Best);
    // Black never moved
    assert_eq!(analysis.accuracy.w, 100);
    assert_eq!(analysis.accuracy.b, 0);
}

#[tokio::test]
async fn test_move_accuracy_above_100_offsets_losses_in_the_mean() {
    let config = ReviewConfig::default();
    let moves = parse_movetext("1. e4 e5 2. d4").unwrap();
    let mut oracle = ScriptedOracle::per_move(vec![
        // 1. e4 lands far better than the pre-move estimate
        (eval(0, &["d2d4"]), eval(300, &["e7e5"])),
        (eval(0, &["e7e5"]), eval(0, &["g1f3"])),
        // 2. d4 drops about 20 points of win chance
        (eval(0, &["g1f3"]), eval(-230, &["e5d4"])),
    ]);

    let analysis = run_session(&mut oracle, &config, &OpeningBook::empty(), &moves)
        .await
        .unwrap();

    assert_eq!(analysis.moves[0].win_delta, -25.1);
    assert_eq!(analysis.moves[0].accuracy, 137.7);
    assert_eq!(analysis.moves[2].win_delta, 20.0);
    assert_eq!(analysis.moves[2].accuracy, 70.0);
    // (137.67 + 70.01) / 2 clamps to 100; capping each move first would give 85
    assert_eq!(analysis.accuracy.w, 100);
    assert_eq!(analysis.accuracy.b, 100);
}

#[tokio::test]
async fn test_illegal_move_aborts_and_releases_oracle() {
    let config = ReviewConfig::default();
    let mut moves = parse_movetext("1. e4").unwrap();
    // Replay White's pawn push on Black's turn
    moves.push(moves[0].clone());
    let mut oracle = ScriptedOracle::default();

    let err = run_session(&mut oracle, &config, &OpeningBook::empty(), &moves)
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::IllegalMove { ply: 2, .. }));
    assert_eq!(oracle.calls.len(), 2);
    assert!(oracle.shut_down);
}

#[tokio::test]
async fn test_oracle_failure_aborts_and_releases_oracle() {
    let config = ReviewConfig::default();
    let moves = parse_movetext("1. e4 e5 2. Nf3").unwrap();
    let mut oracle = ScriptedOracle {
        fail_at: Some(3),
        ..ScriptedOracle::default()
    };

    let err = run_session(&mut oracle, &config, &OpeningBook::empty(), &moves)
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::OracleUnavailable(_)));
    assert!(oracle.shut_down);
}

#[tokio::test]
async fn test_invalid_input_rejected_before_engine_start() {
    let config = ReviewConfig {
        stockfish_path: "/nonexistent/stockfish".into(),
        ..ReviewConfig::default()
    };

    for pgn in ["", "1. e4 e5 2. Ke3", "1. e4 whatever"] {
        let err = analyze_pgn(&config, &OpeningBook::empty(), pgn)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::InvalidInput(_)), "{pgn:?}: {err}");
    }
}

#[tokio::test]
async fn test_missing_engine_is_oracle_unavailable() {
    let config = ReviewConfig {
        stockfish_path: "/nonexistent/stockfish".into(),
        ..ReviewConfig::default()
    };

    let err = analyze_pgn(&config, &OpeningBook::empty(), "1. e4 e5")
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::OracleUnavailable(_)));
}

#[tokio::test]
async fn test_response_json_shape() {
    let config = ReviewConfig::default();
    let game = chess_core::parse_pgn(BLUNDER_GAME).unwrap();
    let moves = parse_movetext(BLUNDER_GAME).unwrap();
    assert_eq!(game.san_moves.len(), moves.len());

    let mut oracle = blunder_script();
    let analysis = run_session(&mut oracle, &config, &parham_book(), &moves)
        .await
        .unwrap();

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["accuracy"]["w"], 99);
    assert_eq!(json["accuracy"]["b"], 66);
    assert_eq!(json["opening"], "Parham Attack");
    assert_eq!(json["moves"].as_array().map(Vec::len), Some(7));
    assert_eq!(json["moves"][5]["category"], "blunder");
    assert_eq!(json["moves"][5]["bestMove"], "g7g6");
    assert_eq!(json["classifications"]["b"]["blunder"], 1);
}
