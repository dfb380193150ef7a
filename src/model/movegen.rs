//! # Move enumeration
//!
//! Turns the [`vision`](crate::model::vision) of a piece into moves.
//! Which moves survive is decided by a [`BlessingStrategy`]: either every
//! pseudo-legal move is kept, or only those which do not leave the
//! mover's king in check.

use std::collections::BTreeSet;

use strum::VariantArray;

use crate::model::{
    ChessColor, ChessMove, ChessPiece, LegalMove, PawnPromotion, PseudoLegal, Square,
    mailbox::ChessBoard,
};

/// Decides which candidate moves are handed out, and in what wrapper.
pub trait BlessingStrategy {
    type Blessing;

    fn bless(board: &ChessBoard, mv: ChessMove) -> Option<Self::Blessing>;

    #[inline]
    fn bless_into(board: &ChessBoard, mv: ChessMove, buffer: &mut Vec<Self::Blessing>) {
        if let Some(b) = Self::bless(board, mv) {
            buffer.push(b)
        }
    }
}

/// Keep every pseudo-legal move.
pub struct NoBlessing;

impl BlessingStrategy for NoBlessing {
    type Blessing = PseudoLegal;

    #[inline]
    fn bless(_board: &ChessBoard, mv: ChessMove) -> Option<Self::Blessing> {
        Some(PseudoLegal(mv))
    }
}

/// Keep moves after which the mover's king is not in check, tested by
/// ghosting the move over the board.
pub struct LegalBlessing;

impl BlessingStrategy for LegalBlessing {
    type Blessing = LegalMove;

    #[inline]
    fn bless(board: &ChessBoard, mv: ChessMove) -> Option<Self::Blessing> {
        board
            .keeps_king_safe(mv.from, mv.to)
            .then_some(LegalMove(mv))
    }
}

/// Enumerate the moves of the piece on `from` into `buffer`.
///
/// Pawn moves onto the last rank come out once per promotion choice.
pub fn enumerate_from<L: BlessingStrategy>(board: &ChessBoard, from: Square, buffer: &mut Vec<L::Blessing>) {
    let Some(piece) = board.piece(from) else {
        return;
    };

    for to in board.vision(from) {
        if piece.ech == ChessPiece::PAWN && to.column_row(piece.col).1 == 7 {
            for ech in PawnPromotion::VARIANTS {
                L::bless_into(board, ChessMove::promoting(from, to, *ech), buffer);
            }
        } else {
            L::bless_into(board, ChessMove::new(from, to), buffer);
        }
    }
}

/// Enumerate the moves of every piece of one color into `buffer`.
pub fn enumerate<L: BlessingStrategy>(board: &ChessBoard, player: ChessColor, buffer: &mut Vec<L::Blessing>) {
    for from in board.squares_of(player) {
        enumerate_from::<L>(board, from, buffer);
    }
}

impl ChessBoard {
    /// Destinations of the piece on `from` which keep its king out of
    /// check. Empty for an empty square.
    pub fn legal_moves(&self, from: Square) -> BTreeSet<Square> {
        self.vision(from)
            .into_iter()
            .filter(|to| self.keeps_king_safe(from, *to))
            .collect()
    }

    /// Whether `from → to` is among the legal moves.
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        self.vision(from).contains(&to) && self.keeps_king_safe(from, to)
    }

    /// Whether any piece of `col` has a legal move.
    pub fn has_legal_move(&self, col: ChessColor) -> bool {
        self.squares_of(col).into_iter().any(|from| {
            self.vision(from)
                .into_iter()
                .any(|to| self.keeps_king_safe(from, to))
        })
    }

    /// Every legal move of `col`, promotions spelled out.
    pub fn all_legal_moves(&self, col: ChessColor) -> Vec<LegalMove> {
        let mut res = Vec::with_capacity(64);
        enumerate::<LegalBlessing>(self, col, &mut res);
        res
    }
}

#[test]
fn startpos_has_twenty_moves() {
    let b = ChessBoard::startpos();
    assert_eq!(b.all_legal_moves(ChessColor::WHITE).len(), 20);
    assert_eq!(b.all_legal_moves(ChessColor::BLACK).len(), 20);

    let mut pseudo = vec![];
    enumerate::<NoBlessing>(&b, ChessColor::WHITE, &mut pseudo);
    assert_eq!(pseudo.len(), 20);
}

#[test]
fn pinned_piece_cannot_leave_the_line() {
    use Square::*;
    let b = ChessBoard::from_fen("4r3/8/8/8/8/8/4N3/4K3 w - -").expect("valid fen");
    assert!(b.legal_moves(e2).is_empty());
    assert_eq!(b.vision(e2).len(), 6);

    let mut pseudo = vec![];
    enumerate_from::<NoBlessing>(&b, e2, &mut pseudo);
    assert_eq!(pseudo.len(), 6);
}

#[test]
fn promotions_are_spelled_out() {
    use Square::*;
    let b = ChessBoard::from_fen("8/P7/8/8/8/8/8/8 w - -").expect("valid fen");
    let moves = b.all_legal_moves(ChessColor::WHITE);
    assert_eq!(moves.len(), 4);
    assert!(moves.iter().all(|m| m.0.from == a7 && m.0.to == a8));
}
