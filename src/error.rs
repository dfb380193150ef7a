//! # Errors
//!
//! Everything that can go wrong with a request to the rules engine.
//! No operation panics on bad input; it returns one of these instead and
//! leaves the board as it was.

use thiserror::Error;

use crate::model::{ChessColor, Square};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A square name outside `a1 ... h8`.
    #[error("invalid square {0:?}")]
    InvalidSquare(String),
    #[error("no piece on {0}")]
    EmptySquare(Square),
    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },
    #[error("invalid promotion: {0}")]
    InvalidPromotionKind(String),
    #[error("malformed FEN: {0}")]
    MalformedFen(String),
    /// The piece on `square` does not belong to the player to move.
    #[error("the piece on {square} cannot move, it is {active}'s turn")]
    OutOfTurn { square: Square, active: ChessColor },
    #[error("configuration error: {0}")]
    Config(String),
}
