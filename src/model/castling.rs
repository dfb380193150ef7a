//! # Castling
//!
//! Castle rights are held explicitly on the board and are the only
//! authority on whether a castling move may still happen. They are
//! revoked when the king moves, when a rook leaves its home square, and
//! when anything lands on a rook's home square (capturing it).

use serde::Serialize;

use crate::model::{
    CastlingSide, ChessColor, ChessPiece, Square,
    attacking::GhostOverlay,
    mailbox::ChessBoard,
};

/// Castling rights, indexed first by [`ChessColor`] then [`CastlingSide`].
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CastleRights(pub [[bool; 2]; 2]);

impl CastleRights {
    pub const START: CastleRights = CastleRights([[true; 2]; 2]);
    pub const NIL: CastleRights = CastleRights([[false; 2]; 2]);

    #[inline]
    pub fn has(&self, col: ChessColor, side: CastlingSide) -> bool {
        self.0[col.ix()][side.ix()]
    }

    #[inline]
    pub fn grant(&mut self, col: ChessColor, side: CastlingSide) {
        self.0[col.ix()][side.ix()] = true
    }

    #[inline]
    pub fn revoke(&mut self, col: ChessColor, side: CastlingSide) {
        self.0[col.ix()][side.ix()] = false
    }

    #[inline]
    pub fn revoke_all(&mut self, col: ChessColor) {
        self.0[col.ix()] = [false; 2]
    }

    /// Revoke whatever right is tied to a rook home square.
    pub fn touch(&mut self, sq: Square) {
        let rules = &CastlingRules::STANDARD;
        for col in [ChessColor::WHITE, ChessColor::BLACK] {
            for side in [CastlingSide::QUEEN, CastlingSide::KING] {
                if rules.rook_start[col.ix()][side.ix()] == sq {
                    self.revoke(col, side);
                }
            }
        }
    }
}

/// Representation of castling.
///
/// The arrays are given as first indexed by color, then by side.
#[derive(Debug)]
pub struct CastlingRules {
    /// Starting squares of the rooks
    pub rook_start: [[Square; 2]; 2],
    /// Ending squares of the rooks
    pub rook_end: [[Square; 2]; 2],
    /// Starting square of the king (there's only one)
    pub king_start: [Square; 2],
    /// Ending squares of the king
    pub king_end: [[Square; 2]; 2],
}

impl CastlingRules {
    pub const STANDARD: CastlingRules = CastlingRules {
        rook_start: [[Square::a1, Square::h1], [Square::a8, Square::h8]],
        rook_end: [[Square::d1, Square::f1], [Square::d8, Square::f8]],
        king_start: [Square::e1, Square::e8],
        king_end: [[Square::c1, Square::g1], [Square::c8, Square::g8]],
    };

    /// Which castling, if any, a king move from `from` to `to` is.
    pub fn side_of(&self, col: ChessColor, from: Square, to: Square) -> Option<CastlingSide> {
        if from != self.king_start[col.ix()] {
            return None;
        }
        [CastlingSide::QUEEN, CastlingSide::KING]
            .into_iter()
            .find(|side| self.king_end[col.ix()][side.ix()] == to)
    }
}

impl ChessBoard {
    /// Whether `col` may castle towards `side` right now.
    ///
    /// Requires the right, an unmoved king and rook on their home
    /// squares, nothing standing between them, and the king not being
    /// in check on its square, the square it crosses, or where it lands.
    pub fn can_castle(&self, col: ChessColor, side: CastlingSide) -> bool {
        let rules = &CastlingRules::STANDARD;
        let king_sq = rules.king_start[col.ix()];
        let rook_sq = rules.rook_start[col.ix()][side.ix()];
        let king_end = rules.king_end[col.ix()][side.ix()];
        let dir = side.direction(col);

        if !self.rights().has(col, side) {
            return false;
        }

        let Some(king) = self.piece(king_sq) else {
            return false;
        };
        if king.col != col || !king.can_castle_towards(dir) {
            return false;
        }

        match self.piece(rook_sq) {
            Some(rook) if rook.col == col && rook.ech == ChessPiece::ROOK => {}
            _ => return false,
        }

        for sq in king_sq.ray(dir, col, 7) {
            if sq == rook_sq {
                break;
            }
            if self.piece(sq).is_some() {
                return false;
            }
        }

        if self.is_check_at(col, king_sq, &GhostOverlay::EMPTY) {
            return false;
        }

        // transit square, then destination
        let man = king.man();
        let path: Vec<Square> = king_sq.ray(dir, col, 2).collect();
        if path.last() != Some(&king_end) {
            return false;
        }
        !path.into_iter().any(|sq| {
            let ghosts = GhostOverlay::EMPTY.vacate(king_sq).occupy(sq, man);
            self.is_check_at(col, sq, &ghosts)
        })
    }
}

#[test]
fn rights_touch_rook_squares() {
    let mut r = CastleRights::START;
    r.touch(Square::h8);
    assert!(!r.has(ChessColor::BLACK, CastlingSide::KING));
    assert!(r.has(ChessColor::BLACK, CastlingSide::QUEEN));
    r.touch(Square::e4);
    assert!(r.has(ChessColor::WHITE, CastlingSide::KING));
    r.revoke_all(ChessColor::WHITE);
    assert_eq!(r, CastleRights([[false, false], [true, false]]));
}

#[test]
fn castling_side_of_king_move() {
    let rules = &CastlingRules::STANDARD;
    assert_eq!(
        rules.side_of(ChessColor::WHITE, Square::e1, Square::g1),
        Some(CastlingSide::KING)
    );
    assert_eq!(
        rules.side_of(ChessColor::BLACK, Square::e8, Square::c8),
        Some(CastlingSide::QUEEN)
    );
    assert_eq!(rules.side_of(ChessColor::WHITE, Square::e1, Square::f1), None);
}
