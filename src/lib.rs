//! A chess rules engine: board representation, legal move generation,
//! check, checkmate and stalemate detection, castling, en passant and
//! promotion, and FEN.

/// Reading game settings.
pub mod config;
/// What can go wrong.
pub mod error;
/// Modeling the game of chess.
pub mod model;
/// Reading and writing chess notation.
pub mod notation;

pub use crate::{
    config::GameConfig,
    error::ChessError,
    model::{
        ChessColor, ChessMan, ChessMove, ChessPiece, Square,
        game::{Game, GameStatus, Turn},
        mailbox::ChessBoard,
        moving::{MoveOutcome, MoveResult},
    },
};
