use catchesstrophy_rules::{ChessBoard, model::perft::perft};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PerftFixtures {
    position: Vec<PerftPosition>,
}

#[derive(Debug, Deserialize)]
struct PerftPosition {
    name: String,
    fen: String,
    nodes: Vec<usize>,
}

fn fixtures() -> PerftFixtures {
    let path = format!("{}/tests/fixtures/perft.toml", env!("CARGO_MANIFEST_DIR"));
    let text = std::fs::read_to_string(path).expect("read fixture");
    toml::from_str(&text).expect("parse fixture")
}

#[test]
fn published_leaf_counts() {
    for pos in fixtures().position {
        let board = ChessBoard::from_fen(&pos.fen).expect("valid fen");
        for (depth, expected) in pos.nodes.iter().enumerate() {
            let res = perft(&board, depth + 1);
            assert_eq!(res.nodes(), *expected, "{} at depth {}", pos.name, depth + 1);
        }
    }
}

#[test]
fn breakdown_by_first_move() {
    let board = ChessBoard::startpos();
    let res = perft(&board, 3);
    assert_eq!(res.nodes(), 8902);
    let e2e4 = res
        .breakdown
        .iter()
        .find(|(mv, _)| mv.to_string() == "e2e4")
        .map(|(_, n)| *n);
    assert_eq!(e2e4, Some(600));
}
