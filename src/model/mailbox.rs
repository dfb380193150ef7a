//! # The 'mailbox' representation of a chessboard.
//!
//! This is the simple and most obvious representation,
//! using a separate value in an array for each square, a so-called
//! 'board'-centric representation.
//!
//! [`Mailbox`] is the generalized version allowing any values, not
//! just pieces, to fill the squares; the FEN codec decodes into a
//! `Mailbox<Option<ChessMan>>` before a [`ChessBoard`] is set up from it.

use strum::IntoEnumIterator;

use crate::model::{
    CastlingSide, ChessColor, ChessMan, ChessPiece, Direction, EnPassant, Square,
    castling::{CastleRights, CastlingRules},
    chessman::Piece,
};

#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Mailbox<T>(pub [T; 64]);

impl<T> Mailbox<T> {
    /// Read a square
    #[inline]
    pub fn get(&self, sq: Square) -> &T {
        &self.0[sq.ix()]
    }

    /// Write to a square
    #[inline]
    pub fn set(&mut self, sq: Square, it: T) {
        self.0[sq.ix()] = it
    }

    /// All squares for which the predicate holds, in a1..h8 order.
    pub fn squares(&self, mut p: impl FnMut(Square, &T) -> bool) -> Vec<Square> {
        Square::iter().filter(|sq| p(*sq, self.get(*sq))).collect()
    }
}

impl<T: Copy> Mailbox<T> {
    pub fn new(it: T) -> Self {
        Self([it; 64])
    }
}

/// The position of a game of chess, minus its history.
///
/// Holds the occupancy of every square, where the kings are, the
/// castle rights, the en-passant state and whose move it is. Knowing
/// how the position came about is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessBoard {
    men: Mailbox<Option<Piece>>,
    kings: [Option<Square>; 2],
    pub(crate) en_passant: Option<EnPassant>,
    pub(crate) rights: CastleRights,
    pub(crate) active: ChessColor,
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::startpos()
    }
}

impl ChessBoard {
    /// A board with nothing on it, White to move and no rights.
    pub fn empty() -> Self {
        Self {
            men: Mailbox::new(None),
            kings: [None; 2],
            en_passant: None,
            rights: CastleRights::NIL,
            active: ChessColor::WHITE,
        }
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        use ChessPiece::*;
        let officers = [ROOK, KNIGHT, BISHOP, QUEEN, KING, BISHOP, KNIGHT, ROOK];

        let mut res = Self::empty();
        for (file, ech) in officers.into_iter().enumerate() {
            let file = file as u8;
            res.place(Square::from_u8(file), Piece::new(ChessColor::WHITE, ech));
            res.place(Square::from_u8(file | 0o10), Piece::new(ChessColor::WHITE, PAWN));
            res.place(Square::from_u8(file | 0o60), Piece::new(ChessColor::BLACK, PAWN));
            res.place(Square::from_u8(file | 0o70), Piece::new(ChessColor::BLACK, ech));
        }
        res.rights = CastleRights::START;
        res
    }

    /// Set up a board from decoded position data.
    ///
    /// Pieces get the reach they would have in a real game leading to
    /// this position: a pawn off its home rank has already used its
    /// double step, and a king without a castle right to a side has
    /// given up the castling step in that direction.
    pub fn from_mailbox(
        men: &Mailbox<Option<ChessMan>>,
        active: ChessColor,
        rights: CastleRights,
        en_passant: Option<EnPassant>,
    ) -> Self {
        let mut res = Self::empty();

        for sq in Square::iter() {
            let Some(man) = *men.get(sq) else { continue };
            let mut piece = Piece::from(man);
            match piece.ech {
                ChessPiece::PAWN => {
                    if sq.column_row(piece.col).1 != 1 {
                        piece.mark_moved(Direction::FORWARD);
                    }
                }
                ChessPiece::KING => {
                    for side in [CastlingSide::QUEEN, CastlingSide::KING] {
                        let dir = side.direction(piece.col);
                        if !rights.has(piece.col, side)
                            || sq != CastlingRules::STANDARD.king_start[piece.col.ix()]
                        {
                            piece.mark_moved(dir);
                        }
                    }
                }
                _ => {}
            }
            res.place(sq, piece);
        }

        res.active = active;
        res.rights = rights;
        res.en_passant = en_passant;
        res
    }

    /// The piece on a square.
    #[inline]
    pub fn piece(&self, sq: Square) -> Option<&Piece> {
        self.men.get(sq).as_ref()
    }

    /// The color and type of the piece on a square.
    #[inline]
    pub fn man(&self, sq: Square) -> Option<ChessMan> {
        self.piece(sq).map(Piece::man)
    }

    /// Snapshot of the board as plain chessmen.
    pub fn mailbox(&self) -> Mailbox<Option<ChessMan>> {
        let mut res = Mailbox::new(None);
        for sq in Square::iter() {
            res.set(sq, self.man(sq));
        }
        res
    }

    /// Squares holding pieces of one color, in a1..h8 order.
    pub fn squares_of(&self, col: ChessColor) -> Vec<Square> {
        self.men.squares(|_, p| p.is_some_and(|p| p.col == col))
    }

    /// Put a piece on a square, replacing whatever was there.
    pub fn place(&mut self, sq: Square, piece: Piece) {
        self.remove(sq);
        if piece.ech == ChessPiece::KING {
            self.kings[piece.col.ix()] = Some(sq);
        }
        self.men.set(sq, Some(piece));
    }

    /// Take whatever is on a square off the board.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let res = self.men.0[sq.ix()].take();
        if let Some(p) = res {
            if p.ech == ChessPiece::KING && self.kings[p.col.ix()] == Some(sq) {
                self.kings[p.col.ix()] = None;
            }
        }
        res
    }

    /// Where the king of a color stands, if it is on the board.
    #[inline]
    pub fn king(&self, col: ChessColor) -> Option<Square> {
        self.kings[col.ix()]
    }

    #[inline]
    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    #[inline]
    pub fn rights(&self) -> CastleRights {
        self.rights
    }

    /// The player whose move it is.
    #[inline]
    pub fn active(&self) -> ChessColor {
        self.active
    }
}

#[test]
fn startpos_layout() {
    let b = ChessBoard::startpos();
    assert_eq!(b.man(Square::e1), Some(ChessMan::WHITE_KING));
    assert_eq!(b.man(Square::d8), Some(ChessMan::BLACK_QUEEN));
    assert_eq!(b.man(Square::h7), Some(ChessMan::BLACK_PAWN));
    assert_eq!(b.man(Square::e4), None);
    assert_eq!(b.king(ChessColor::WHITE), Some(Square::e1));
    assert_eq!(b.king(ChessColor::BLACK), Some(Square::e8));
    assert_eq!(b.squares_of(ChessColor::WHITE).len(), 16);
    assert_eq!(b.squares_of(ChessColor::BLACK).len(), 16);
}

#[test]
fn place_and_remove_track_kings() {
    let mut b = ChessBoard::empty();
    b.place(Square::d4, Piece::new(ChessColor::BLACK, ChessPiece::KING));
    assert_eq!(b.king(ChessColor::BLACK), Some(Square::d4));
    b.place(Square::d4, Piece::new(ChessColor::WHITE, ChessPiece::ROOK));
    assert_eq!(b.king(ChessColor::BLACK), None);
    assert_eq!(b.remove(Square::d4).map(|p| p.man()), Some(ChessMan::WHITE_ROOK));
    assert_eq!(b.piece(Square::d4), None);
}
