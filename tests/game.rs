use catchesstrophy_rules::{
    ChessBoard, ChessColor, ChessError, ChessPiece, Game, GameConfig, GameStatus, MoveOutcome,
    Square, notation::fen::STARTPOS,
};

#[test]
fn scholars_mate() {
    let mut game = Game::new();
    for mv in ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"] {
        let turn = game.play_str(mv).expect("legal");
        assert_eq!(turn.status, GameStatus::InProgress, "after {mv}");
    }
    let turn = game.play_str("h5f7").expect("legal");
    assert_eq!(turn.status, GameStatus::Checkmate);
    assert_eq!(
        turn.fen,
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq -"
    );
    assert!(game.status().is_over());
}

#[test]
fn transcript_follows_the_moves() {
    let mut game = Game::new();
    game.play_str("e2e4").expect("legal");
    game.play_str("c7c5").expect("legal");
    assert_eq!(
        game.transcript(),
        [
            STARTPOS,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6",
        ]
    );
    for fen in game.transcript() {
        assert_eq!(ChessBoard::from_fen(fen).map(|b| b.to_fen()).as_ref(), Ok(fen));
    }
}

#[test]
fn castling_through_a_game() {
    let mut game = Game::new();
    for mv in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"] {
        game.play_str(mv).expect("legal");
    }
    assert!(game.legal_moves(Square::e1).expect("white to move").contains(&Square::g1));
    let turn = game.play_str("e1g1").expect("legal");
    assert_eq!(turn.outcome.applied().map(|r| r.len()), Some(4));
    assert!(turn.fen.ends_with(" b kq -"));
    assert_eq!(game.board().king(ChessColor::WHITE), Some(Square::g1));
}

#[test]
fn rook_moves_forfeit_one_side() {
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -").expect("valid fen");
    game.play_str("h1h5").expect("legal");
    game.play_str("a8a5").expect("legal");
    assert_eq!(game.board().to_fen(), "4k2r/8/8/r6R/8/8/8/R3K3 w Qk -");
    assert!(!game.legal_moves(Square::e1).expect("white to move").contains(&Square::g1));
    assert!(game.legal_moves(Square::e1).expect("white to move").contains(&Square::c1));
}

#[test]
fn promotion_flow() {
    let mut game = Game::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - -").expect("valid fen");
    let turn = game.play_str("b7b8").expect("legal");
    assert_eq!(
        turn.outcome,
        MoveOutcome::PromotionPending {
            from: Square::b7,
            to: Square::b8
        }
    );
    assert!(matches!(
        game.play_str("b7b8k"),
        Err(ChessError::InvalidPromotionKind(_))
    ));
    assert!(matches!(
        game.play_str("b7b8x"),
        Err(ChessError::InvalidPromotionKind(_))
    ));
    let turn = game.play_str("b7b8r").expect("legal");
    assert_eq!(turn.status, GameStatus::Check);
    assert_eq!(
        game.board().man(Square::b8).map(|m| m.ech()),
        Some(ChessPiece::ROOK)
    );
    assert_eq!(game.history().len(), 1);
}

#[test]
fn replay_stops_at_the_first_bad_move() {
    let mut game = Game::new();
    let moves = ["e2e4", "e7e5", "e4e5"].map(|m| m.parse().expect("valid move"));
    assert_eq!(
        game.replay(moves),
        Err(ChessError::IllegalMove {
            from: Square::e4,
            to: Square::e5
        })
    );
    assert_eq!(game.history().len(), 2);
    assert_eq!(game.active(), ChessColor::WHITE);
}

#[test]
fn configured_game() {
    let cfg = GameConfig::from_toml_str(
        r#"
        start_fen = "4k3/8/8/8/8/8/8/4K2R w K -"
        repetition_limit = 2
        "#,
    )
    .expect("valid config");
    let mut game = Game::from_config(cfg).expect("valid fen");
    for mv in ["h1h2", "e8d8", "h2h1", "d8e8"] {
        game.play_str(mv).expect("legal");
    }
    // the rook has moved, so the position differs from the start
    assert_eq!(game.status(), GameStatus::InProgress);
    game.play_str("h1h2").expect("legal");
    assert_eq!(game.status(), GameStatus::Repetition);

    let bad = GameConfig::from_toml_str(r#"start_fen = "nonsense""#).expect("valid config");
    assert!(matches!(
        Game::from_config(bad),
        Err(ChessError::MalformedFen(_))
    ));
}
