use std::collections::BTreeSet;

use catchesstrophy_rules::{
    ChessBoard, ChessColor, ChessMan, MoveOutcome, MoveResult, Square, Square::*,
};

fn board(fen: &str) -> ChessBoard {
    ChessBoard::from_fen(fen).expect("valid fen")
}

fn set<const N: usize>(squares: [Square; N]) -> BTreeSet<Square> {
    squares.into_iter().collect()
}

#[test]
fn lone_rook_in_the_corner() {
    let b = board("8/8/8/8/8/8/8/R7 w - -");
    assert_eq!(
        b.legal_moves(a1),
        set([a2, a3, a4, a5, a6, a7, a8, b1, c1, d1, e1, f1, g1, h1])
    );
}

#[test]
fn lone_knight_in_the_corner() {
    let b = board("8/8/8/8/8/8/8/N7 w - -");
    assert_eq!(b.legal_moves(a1), set([b3, c2]));
}

#[test]
fn lone_bishop_in_the_centre() {
    let b = board("8/8/8/8/3B4/8/8/8 w - -");
    assert_eq!(
        b.legal_moves(d4),
        set([a1, b2, c3, e5, f6, g7, h8, a7, b6, c5, e3, f2, g1])
    );
}

#[test]
fn sliders_stop_at_the_first_piece() {
    let b = board("8/8/3p4/8/1P1Q2n1/8/8/8 w - -");
    let moves = b.legal_moves(d4);
    // enemy blockers are captured, friendly ones are not
    assert!(moves.contains(&d6));
    assert!(!moves.contains(&d7));
    assert!(moves.contains(&c4));
    assert!(!moves.contains(&b4));
    assert!(moves.contains(&g4));
    assert!(!moves.contains(&h4));
    assert!(moves.contains(&d1));
    assert!(moves.contains(&a7));
    assert!(moves.contains(&h8));
}

#[test]
fn en_passant_capture() {
    let mut b = board("4k3/p7/8/1P6/8/8/8/4K3 b - -");
    b.apply_move(a7, a5, None).expect("legal");
    assert!(b.legal_moves(b5).contains(&a6));

    let res = b.apply_move(b5, a6, None).expect("legal");
    assert_eq!(
        res,
        MoveOutcome::Applied(MoveResult::from([
            (b5, None),
            (a5, None),
            (a6, Some(ChessMan::WHITE_PAWN)),
        ]))
    );
    assert_eq!(b.man(a5), None);
}

#[test]
fn en_passant_expires() {
    let mut b = board("4k3/p6p/8/1P6/8/8/8/4K3 b - -");
    b.apply_move(a7, a5, None).expect("legal");
    b.apply_move(e1, d1, None).expect("legal");
    b.apply_move(h7, h6, None).expect("legal");
    assert!(!b.legal_moves(b5).contains(&a6));
}

#[test]
fn castling_refused_through_attacked_square() {
    let b = board("8/8/8/3r4/8/8/8/R3K3 w Q -");
    let moves = b.legal_moves(e1);
    assert!(!moves.contains(&c1));
    assert!(!moves.contains(&d1));
    assert!(moves.contains(&f1));

    let b = board("8/8/8/8/8/8/8/R3K3 w Q -");
    assert!(b.legal_moves(e1).contains(&c1));
}

#[test]
fn castling_refused_out_of_check_and_into_check() {
    let b = board("4r3/8/8/8/8/8/8/R3K2R w KQ -");
    assert!(!b.legal_moves(e1).contains(&c1));
    assert!(!b.legal_moves(e1).contains(&g1));

    let b = board("6r1/8/8/8/8/8/8/R3K2R w KQ -");
    assert!(b.legal_moves(e1).contains(&c1));
    assert!(!b.legal_moves(e1).contains(&g1));

    // b1 may be attacked on the queen side; the king never crosses it
    let b = board("1r6/8/8/8/8/8/8/R3K2R w KQ -");
    assert!(b.legal_moves(e1).contains(&c1));
}

#[test]
fn checkmate_fixture() {
    let b = board("8/8/8/8/8/2p5/Pp6/KB6 w - -");
    assert!(b.is_check(ChessColor::WHITE));
    assert!(b.is_checkmate(ChessColor::WHITE));
    assert!(!b.is_stalemate(ChessColor::WHITE));
}

#[test]
fn checkmate_needs_every_piece_stuck() {
    // the king cannot move, but the rook can capture the checker
    let b = board("8/8/8/8/8/2p5/Pp5R/KB6 w - -");
    assert!(b.is_check(ChessColor::WHITE));
    assert!(!b.is_checkmate(ChessColor::WHITE));
    assert!(b.legal_moves(a1).is_empty());
    assert_eq!(b.legal_moves(h2), set([b2]));
}

#[test]
fn stalemate_fixture() {
    let b = board("8/8/8/8/1RB5/8/2K5/k7 b - -");
    assert!(!b.is_check(ChessColor::BLACK));
    assert!(b.is_stalemate(ChessColor::BLACK));
    assert!(!b.is_checkmate(ChessColor::BLACK));
}

#[test]
fn blocking_and_pins() {
    let b = board("4k3/8/8/8/8/8/3B4/r2K4 w - -");
    assert!(b.is_check(ChessColor::WHITE));
    assert_eq!(b.legal_moves(d2), set([c1]));
    // stepping along the rank stays in the rook's line
    assert_eq!(b.legal_moves(d1), set([c2, e2]));

    let b = board("4k3/8/8/8/1b6/8/3N4/4K3 w - -");
    assert!(!b.is_check(ChessColor::WHITE));
    assert!(b.legal_moves(d2).is_empty());
}
