//! # What a chessman can see.
//!
//! Pseudo-legal destinations of the piece on a square, following its
//! [`Reach`](crate::model::chessman::Reach) table. Nothing here looks at
//! the safety of the mover's king; that is the job of
//! [`movegen`](crate::model::movegen).

use crate::model::{
    CastlingSide, ChessPiece, Direction, EnPassant, Square,
    castling::CastlingRules,
    chessman::{Piece, Steps},
    mailbox::ChessBoard,
};

impl ChessBoard {
    /// Pseudo-legal destination squares of the piece on `from`.
    ///
    /// Empty if the square is empty.
    pub fn vision(&self, from: Square) -> Vec<Square> {
        let mut res = Vec::with_capacity(27);
        let Some(piece) = self.piece(from) else {
            return res;
        };

        match piece.ech {
            ChessPiece::PAWN => self.pawn_vision(from, piece, &mut res),
            ChessPiece::KING => self.king_vision(from, piece, &mut res),
            _ => self.officer_vision(from, piece, &mut res),
        }

        res
    }

    /// Rays stop at the first occupied square, which is included if and
    /// only if it holds an enemy.
    fn ray_vision(&self, from: Square, piece: &Piece, dir: Direction, limit: u8, out: &mut Vec<Square>) {
        for to in from.ray(dir, piece.col, limit) {
            match self.piece(to) {
                None => out.push(to),
                Some(other) => {
                    if other.col != piece.col {
                        out.push(to);
                    }
                    break;
                }
            }
        }
    }

    fn officer_vision(&self, from: Square, piece: &Piece, out: &mut Vec<Square>) {
        for (dir, steps) in piece.reach.iter() {
            match steps {
                Steps::Hop => {
                    for to in from.knight_hops(piece.col) {
                        if self.piece(to).is_none_or(|other| other.col != piece.col) {
                            out.push(to);
                        }
                    }
                }
                _ => self.ray_vision(from, piece, dir, steps.limit(), out),
            }
        }
    }

    /// The forward ray never captures; the forward diagonals only ever
    /// capture, either an enemy standing there or en passant.
    fn pawn_vision(&self, from: Square, piece: &Piece, out: &mut Vec<Square>) {
        for (dir, steps) in piece.reach.iter() {
            if dir == Direction::FORWARD {
                for to in from.ray(dir, piece.col, steps.limit()) {
                    if self.piece(to).is_some() {
                        break;
                    }
                    out.push(to);
                }
            } else if dir.is_forward_diagonal() {
                let Some(to) = from.step(dir, piece.col) else {
                    continue;
                };
                let enemy = self.piece(to).is_some_and(|other| other.col != piece.col);
                if enemy || self.en_passant_capture(from, to).is_some() {
                    out.push(to);
                }
            }
        }
    }

    /// Single steps in every direction, plus castling when eligible.
    fn king_vision(&self, from: Square, piece: &Piece, out: &mut Vec<Square>) {
        for (dir, _) in piece.reach.iter() {
            self.ray_vision(from, piece, dir, 1, out);
        }

        let rules = &CastlingRules::STANDARD;
        for side in [CastlingSide::QUEEN, CastlingSide::KING] {
            if from == rules.king_start[piece.col.ix()] && self.can_castle(piece.col, side) {
                out.push(rules.king_end[piece.col.ix()][side.ix()]);
            }
        }
    }

    /// The en-passant capture that `from → to` would be, if any.
    ///
    /// Requires a pawn on `from` moving diagonally forward onto the
    /// recorded target, with an enemy pawn on the creator square.
    pub fn en_passant_capture(&self, from: Square, to: Square) -> Option<EnPassant> {
        let ep = self.en_passant?;
        let pawn = self.piece(from)?;
        if pawn.ech != ChessPiece::PAWN || ep.target != to {
            return None;
        }
        let (dir, _, dr) = from.direction_to(to, pawn.col)?;
        if !dir.is_forward_diagonal() || dr != 1 {
            return None;
        }
        let victim = self.piece(ep.creator)?;
        (victim.ech == ChessPiece::PAWN && victim.col != pawn.col).then_some(ep)
    }
}

#[cfg(test)]
fn sorted(mut v: Vec<Square>) -> Vec<Square> {
    v.sort();
    v
}

#[test]
fn lone_rook_sees_file_and_rank() {
    let b = ChessBoard::from_fen("8/8/8/8/8/8/8/R7 w - -").expect("valid fen");
    let v = b.vision(Square::a1);
    assert_eq!(v.len(), 14);
    assert!(v.contains(&Square::a8));
    assert!(v.contains(&Square::h1));
}

#[test]
fn pawn_forward_is_blocked_by_anyone() {
    use Square::*;
    let b = ChessBoard::from_fen("8/8/8/8/8/4p3/4P3/8 w - -").expect("valid fen");
    assert!(b.vision(e2).is_empty());

    let b = ChessBoard::from_fen("8/8/8/8/4n3/8/4P3/8 w - -").expect("valid fen");
    assert_eq!(b.vision(e2), vec![e3]);

    let b = ChessBoard::from_fen("8/8/8/8/8/3p1P2/4P3/8 w - -").expect("valid fen");
    assert_eq!(sorted(b.vision(e2)), vec![d3, e3, e4]);
}

#[test]
fn black_pawn_moves_down() {
    use Square::*;
    let b = ChessBoard::from_fen("8/3p4/4P3/8/8/8/8/8 b - -").expect("valid fen");
    assert_eq!(sorted(b.vision(d7)), vec![d5, d6, e6]);
}

#[test]
fn moved_pawn_single_step() {
    use Square::*;
    let b = ChessBoard::from_fen("8/8/8/8/8/4P3/8/8 w - -").expect("valid fen");
    assert_eq!(b.vision(e3), vec![e4]);
}
