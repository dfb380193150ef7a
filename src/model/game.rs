//! # Playing a game
//!
//! The check, checkmate and stalemate predicates on [`ChessBoard`], and
//! [`Game`], which strings positions together: it enforces the order of
//! turns, remembers the moves played, and notices when a position has
//! come up often enough to draw the game.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    config::GameConfig,
    error::ChessError,
    model::{
        ChessColor, ChessMove, Square,
        attacking::GhostOverlay,
        mailbox::ChessBoard,
        moving::MoveOutcome,
    },
};

impl ChessBoard {
    /// Whether the king of `col` is attacked. A color without a king is
    /// never in check.
    pub fn is_check(&self, col: ChessColor) -> bool {
        self.king(col)
            .is_some_and(|king| self.is_check_at(col, king, &GhostOverlay::EMPTY))
    }

    /// In check with no legal move for any piece.
    pub fn is_checkmate(&self, col: ChessColor) -> bool {
        self.is_check(col) && !self.has_legal_move(col)
    }

    /// Not in check, yet no legal move for any piece.
    pub fn is_stalemate(&self, col: ChessColor) -> bool {
        !self.is_check(col) && !self.has_legal_move(col)
    }
}

/// The state of a game as seen by the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GameStatus {
    InProgress,
    /// The player to move is in check.
    Check,
    /// The player to move has lost.
    Checkmate,
    Stalemate,
    /// The same position has occurred the configured number of times.
    Repetition,
}

impl GameStatus {
    /// No more moves can be played.
    pub fn is_over(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate | Self::Repetition)
    }

    /// Status of a position on its own, without regard to repetition.
    pub fn of(board: &ChessBoard) -> Self {
        let col = board.active();
        match (board.is_check(col), board.has_legal_move(col)) {
            (true, false) => Self::Checkmate,
            (false, false) => Self::Stalemate,
            (true, true) => Self::Check,
            (false, true) => Self::InProgress,
        }
    }
}

/// What a collaborator is told after each move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub outcome: MoveOutcome,
    pub status: GameStatus,
    /// The position after the move.
    pub fen: String,
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: ChessBoard,
    history: Vec<ChessMove>,
    transcript: Vec<String>,
    seen: HashMap<u64, u8>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard starting position, with default settings.
    pub fn new() -> Self {
        Self::start(GameConfig::default(), ChessBoard::startpos())
    }

    /// A game from a FEN position, with default settings.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Self::from_config(GameConfig {
            start_fen: fen.to_string(),
            ..GameConfig::default()
        })
    }

    pub fn from_config(config: GameConfig) -> Result<Self, ChessError> {
        let board = ChessBoard::from_fen(&config.start_fen)?;
        Ok(Self::start(config, board))
    }

    fn start(config: GameConfig, board: ChessBoard) -> Self {
        let mut res = Self {
            config,
            transcript: vec![board.to_fen()],
            status: GameStatus::of(&board),
            board,
            history: vec![],
            seen: HashMap::new(),
        };
        res.remember();
        res
    }

    /// Count the current position, returning how often it has occurred.
    fn remember(&mut self) -> u8 {
        let n = self.seen.entry(self.board.zobrist()).or_insert(0);
        *n = n.saturating_add(1);
        *n
    }

    /// Play a move for the player whose turn it is.
    ///
    /// A pawn move to the last rank without a promotion comes back as
    /// [`MoveOutcome::PromotionPending`] and is not played; repeat the
    /// request with a promotion. Once the game is over, every move is
    /// illegal.
    pub fn play(&mut self, mv: ChessMove) -> Result<Turn, ChessError> {
        let ChessMove { from, to, promotion } = mv;

        let piece = self.board.piece(from).ok_or(ChessError::EmptySquare(from))?;
        if self.config.enforce_turns && piece.col != self.board.active() {
            return Err(ChessError::OutOfTurn {
                square: from,
                active: self.board.active(),
            });
        }
        if self.status.is_over() {
            return Err(ChessError::IllegalMove { from, to });
        }

        let outcome = self.board.apply_move(from, to, promotion)?;
        if let MoveOutcome::Applied(_) = outcome {
            self.history.push(mv);
            self.transcript.push(self.board.to_fen());
            let seen = self.remember();
            let limit = self.config.repetition_limit;
            self.status = match GameStatus::of(&self.board) {
                GameStatus::InProgress | GameStatus::Check if limit > 0 && seen >= limit => {
                    GameStatus::Repetition
                }
                status => status,
            };
        }

        Ok(Turn {
            outcome,
            status: self.status,
            fen: self.board.to_fen(),
        })
    }

    /// Play a move given in coordinate notation, like `e2e4` or `e7e8q`.
    pub fn play_str(&mut self, mv: &str) -> Result<Turn, ChessError> {
        self.play(mv.parse()?)
    }

    /// Play a list of moves in order, stopping at the first that fails.
    ///
    /// A promotion left open counts as a failure here.
    pub fn replay(&mut self, moves: impl IntoIterator<Item = ChessMove>) -> Result<(), ChessError> {
        for mv in moves {
            if let MoveOutcome::PromotionPending { from, to } = self.play(mv)?.outcome {
                return Err(ChessError::InvalidPromotionKind(format!(
                    "{from}{to} needs a promotion"
                )));
            }
        }
        Ok(())
    }

    /// Legal destinations of the piece on `from`, if it is that
    /// player's turn.
    pub fn legal_moves(&self, from: Square) -> Result<Vec<Square>, ChessError> {
        let piece = self.board.piece(from).ok_or(ChessError::EmptySquare(from))?;
        if self.config.enforce_turns && piece.col != self.board.active() {
            return Err(ChessError::OutOfTurn {
                square: from,
                active: self.board.active(),
            });
        }
        if self.status.is_over() {
            return Ok(vec![]);
        }
        Ok(self.board.legal_moves(from).into_iter().collect())
    }

    #[inline]
    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Moves played so far.
    #[inline]
    pub fn history(&self) -> &[ChessMove] {
        &self.history
    }

    /// The starting position and the position after each move, as FEN.
    #[inline]
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The player to move.
    #[inline]
    pub fn active(&self) -> ChessColor {
        self.board.active()
    }
}

#[cfg(test)]
fn moves(s: &str) -> Vec<ChessMove> {
    s.split_whitespace()
        .map(|m| m.parse().expect("valid move"))
        .collect()
}

#[test]
fn fools_mate() {
    let mut game = Game::new();
    game.replay(moves("f2f3 e7e5 g2g4")).expect("legal");
    let turn = game.play_str("d8h4").expect("legal");
    assert_eq!(turn.status, GameStatus::Checkmate);
    assert!(game.board().is_checkmate(ChessColor::WHITE));
    assert!(!game.board().is_stalemate(ChessColor::WHITE));
    assert_eq!(game.history().len(), 4);
    assert_eq!(game.transcript().len(), 5);
    assert_eq!(
        game.play_str("a2a3"),
        Err(ChessError::IllegalMove {
            from: Square::a2,
            to: Square::a3
        })
    );
}

#[test]
fn turns_are_enforced() {
    let mut game = Game::new();
    assert_eq!(
        game.play_str("e7e5"),
        Err(ChessError::OutOfTurn {
            square: Square::e7,
            active: ChessColor::WHITE
        })
    );
    assert_eq!(
        game.legal_moves(Square::e7),
        Err(ChessError::OutOfTurn {
            square: Square::e7,
            active: ChessColor::WHITE
        })
    );
    assert_eq!(game.play_str("e3e4"), Err(ChessError::EmptySquare(Square::e3)));

    let mut free = Game::from_config(GameConfig {
        enforce_turns: false,
        ..GameConfig::default()
    })
    .expect("valid config");
    assert!(free.play_str("e7e5").is_ok());
}

#[test]
fn check_is_reported() {
    let mut game = Game::new();
    game.replay(moves("e2e4 f7f6")).expect("legal");
    let turn = game.play_str("d1h5").expect("legal");
    assert_eq!(turn.status, GameStatus::Check);
    assert_eq!(game.legal_moves(Square::e8), Ok(vec![]));
    assert_eq!(game.legal_moves(Square::g7), Ok(vec![Square::g6]));
}

#[test]
fn stalemate_is_reported() {
    let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - -").expect("valid fen");
    assert_eq!(game.status(), GameStatus::Stalemate);
    assert!(game.board().is_stalemate(ChessColor::BLACK));
    assert!(!game.board().is_checkmate(ChessColor::BLACK));
}

#[test]
fn threefold_repetition() {
    let mut game = Game::new();
    game.replay(moves("g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1"))
        .expect("legal");
    assert_eq!(game.status(), GameStatus::InProgress);
    let turn = game.play_str("f6g8").expect("legal");
    assert_eq!(turn.status, GameStatus::Repetition);
    assert!(game.play_str("g1f3").is_err());

    let mut game = Game::from_config(GameConfig {
        repetition_limit: 0,
        ..GameConfig::default()
    })
    .expect("valid config");
    game.replay(moves("g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1 f6g8"))
        .expect("legal");
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn pending_promotion_is_not_recorded() {
    let mut game = Game::from_fen("7k/P7/8/8/8/8/8/K7 w - -").expect("valid fen");
    let turn = game.play_str("a7a8").expect("legal");
    assert_eq!(
        turn.outcome,
        MoveOutcome::PromotionPending {
            from: Square::a7,
            to: Square::a8
        }
    );
    assert!(game.history().is_empty());
    assert_eq!(game.active(), ChessColor::WHITE);

    let turn = game.play_str("a7a8q").expect("legal");
    assert_eq!(turn.status, GameStatus::Check);
    assert_eq!(turn.fen, "Q6k/8/8/8/8/8/8/K7 b - -");
}
