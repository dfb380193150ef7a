//! # Modeling the rules of chess.
//!
//! The board is a 'mailbox' of 64 squares, each optionally holding a
//! [`Piece`](chessman::Piece). Everything geometric is expressed from the
//! point of view of a color (see [`coords`]), which lets the move
//! generator say "forward" once instead of twice.

use serde::Serialize;
use strum::{EnumIs, EnumIter, VariantArray, VariantNames};

pub mod attacking;
pub mod castling;
pub mod chessman;
pub mod coords;
pub mod game;
pub mod hash;
pub mod mailbox;
pub mod movegen;
pub mod moving;
pub mod perft;
pub mod vision;

/// The 64 squares, numbered in octal as `0o<rank><file>` so that
/// a1 = 0, h1 = 7, a2 = 8 and h8 = 63.
///
/// This is the so called file-major little-endian layout, and it is
/// also White's own index space. Black's index space is the same
/// board rotated 180 degrees, see [`Square::index`].
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
     VariantNames, EnumIter, Serialize)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Square {
    a1 = 0o00, b1 = 0o01, c1 = 0o02, d1 = 0o03, e1 = 0o04, f1 = 0o05, g1 = 0o06, h1 = 0o07,
    a2 = 0o10, b2 = 0o11, c2 = 0o12, d2 = 0o13, e2 = 0o14, f2 = 0o15, g2 = 0o16, h2 = 0o17,
    a3 = 0o20, b3 = 0o21, c3 = 0o22, d3 = 0o23, e3 = 0o24, f3 = 0o25, g3 = 0o26, h3 = 0o27,
    a4 = 0o30, b4 = 0o31, c4 = 0o32, d4 = 0o33, e4 = 0o34, f4 = 0o35, g4 = 0o36, h4 = 0o37,
    a5 = 0o40, b5 = 0o41, c5 = 0o42, d5 = 0o43, e5 = 0o44, f5 = 0o45, g5 = 0o46, h5 = 0o47,
    a6 = 0o50, b6 = 0o51, c6 = 0o52, d6 = 0o53, e6 = 0o54, f6 = 0o55, g6 = 0o56, h6 = 0o57,
    a7 = 0o60, b7 = 0o61, c7 = 0o62, d7 = 0o63, e7 = 0o64, f7 = 0o65, g7 = 0o66, h7 = 0o67,
    a8 = 0o70, b8 = 0o71, c8 = 0o72, d8 = 0o73, e8 = 0o74, f8 = 0o75, g8 = 0o76, h8 = 0o77,
}

impl Square {
    /// Index into a 64-entry board array.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// Infallible conversion from a u8 by way of truncating the
    /// extraneous bits.
    #[inline]
    pub fn from_u8(ix: u8) -> Self {
        unsafe { std::mem::transmute::<u8, Self>(ix & 0x3Fu8) }
    }

    /// File and rank of this square.
    #[inline]
    pub fn coords(self) -> (BoardFile, BoardRank) {
        (
            BoardFile::from_u8(self as u8),
            BoardRank::from_u8((self as u8 & 0x38) >> 3),
        )
    }

    /// Join file and rank into a square
    #[inline]
    pub fn from_coords(f: BoardFile, r: BoardRank) -> Self {
        Self::from_u8(f as u8 | (r as u8) << 3)
    }

    /// The same square with the board turned around.
    #[inline]
    pub fn rotate(self) -> Self {
        Self::from_u8(63u8 - self as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BoardRank {
    _1 = 0,
    _2 = 1,
    _3 = 2,
    _4 = 3,
    _5 = 4,
    _6 = 5,
    _7 = 6,
    _8 = 7,
}

impl BoardRank {
    pub const VARIANTS: &'static [&'static str] = &["1", "2", "3", "4", "5", "6", "7", "8"];

    /// Index into an 8-entry rank array.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// Infallible conversion from a u8 by way of truncating the
    /// extraneous bits.
    #[inline]
    pub fn from_u8(ix: u8) -> Self {
        unsafe { std::mem::transmute::<u8, Self>(ix & 0x7) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
#[repr(u8)]
pub enum BoardFile {
    a_ = 0,
    b_ = 1,
    c_ = 2,
    d_ = 3,
    e_ = 4,
    f_ = 5,
    g_ = 6,
    h_ = 7,
}

impl BoardFile {
    pub const VARIANTS: &'static [&'static str] = &["a", "b", "c", "d", "e", "f", "g", "h"];

    /// Index into an 8-entry file array.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// Infallible conversion from a u8 by way of truncating the
    /// extraneous bits.
    #[inline]
    pub fn from_u8(ix: u8) -> Self {
        unsafe { std::mem::transmute::<u8, Self>(ix & 0x7) }
    }
}

/// Representation of a chessman as seen from the outside:
/// just its color and piece type.
///
/// Zero is never a discriminant, so `Option<ChessMan>` fits in a
/// byte. The sign is the color.
///
/// This is what ghost overlays, move results and FEN deal in. The
/// stateful per-instance representation is [`chessman::Piece`].
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, VariantArray, Hash, Serialize)]
#[repr(i8)]
pub enum ChessMan {
    BLACK_KING = -6,
    BLACK_QUEEN = -5,
    BLACK_ROOK = -4,
    BLACK_BISHOP = -3,
    BLACK_KNIGHT = -2,
    BLACK_PAWN = -1,
    WHITE_PAWN = 1,
    WHITE_KNIGHT = 2,
    WHITE_BISHOP = 3,
    WHITE_ROOK = 4,
    WHITE_QUEEN = 5,
    WHITE_KING = 6,
}

impl ChessMan {
    /// Combine color and piece type.
    #[inline]
    pub fn new(col: ChessColor, ech: ChessPiece) -> Self {
        unsafe { std::mem::transmute::<i8, Self>(col.sign() * ech as i8) }
    }

    #[inline]
    pub fn col(self) -> ChessColor {
        ChessColor::from(self)
    }

    #[inline]
    pub fn ech(self) -> ChessPiece {
        ChessPiece::from(self)
    }
}

/// Color of a player or chessman.
///
/// Discriminants are 0 and 1 rather than the signs used by
/// [`ChessMan`]; tables are laid out `[white, black]`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, Serialize)]
#[repr(u8)]
pub enum ChessColor {
    WHITE = 0,
    BLACK = 1,
}

impl ChessColor {
    /// The other side.
    #[inline]
    pub fn opp(self) -> Self {
        match self {
            Self::WHITE => Self::BLACK,
            Self::BLACK => Self::WHITE,
        }
    }

    /// Sign of this color's [`ChessMan`] discriminants.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Self::WHITE => 1,
            Self::BLACK => -1,
        }
    }

    /// Index into a `[white, black]` table.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }
}

/// Color from the sign of the discriminant.
impl From<ChessMan> for ChessColor {
    fn from(value: ChessMan) -> Self {
        if (value as i8) < 0 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

/// Representation of the piece types of chessmen.
///
/// Discriminants equal the white [`ChessMan`] discriminants.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, VariantArray, EnumIs,
    Serialize)]
#[repr(u8)]
pub enum ChessPiece {
    PAWN = 1,
    KNIGHT = 2,
    BISHOP = 3,
    ROOK = 4,
    QUEEN = 5,
    KING = 6,
}

impl ChessPiece {
    /// Zero-based index, one below the discriminant.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize - 1
    }
}

/// Piece type from the magnitude of the discriminant.
impl From<ChessMan> for ChessPiece {
    #[inline]
    fn from(value: ChessMan) -> Self {
        unsafe { std::mem::transmute((value as i8).unsigned_abs()) }
    }
}

/// Every promotion kind is a piece type.
impl From<PawnPromotion> for ChessPiece {
    #[inline]
    fn from(value: PawnPromotion) -> Self {
        unsafe { std::mem::transmute(value) }
    }
}

/// Piece types a pawn may promote to.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, VariantArray, Serialize)]
#[repr(u8)]
pub enum PawnPromotion {
    KNIGHT = 2,
    BISHOP = 3,
    ROOK = 4,
    QUEEN = 5,
}

impl PawnPromotion {
    /// See [`ChessPiece::ix`].
    #[inline]
    pub fn ix(self) -> usize {
        self as usize - 1
    }
}

/// Subset restriction; pawns and kings are not promotion targets.
impl TryFrom<ChessPiece> for PawnPromotion {
    type Error = ChessPiece;

    fn try_from(value: ChessPiece) -> Result<Self, Self::Error> {
        match value {
            ChessPiece::KNIGHT => Ok(Self::KNIGHT),
            ChessPiece::BISHOP => Ok(Self::BISHOP),
            ChessPiece::ROOK => Ok(Self::ROOK),
            ChessPiece::QUEEN => Ok(Self::QUEEN),
            other => Err(other),
        }
    }
}

/// Representation of the directions a chessman can travel in,
/// relative to the player owning it.
///
/// ```text
///  FWD_LEFT  FORWARD  FWD_RIGHT
///         +7   +8   +9
///   LEFT  -1   ..   +1  RIGHT
///         -9   -8   -7
/// BACK_LEFT BACKWARD BACK_RIGHT
/// ```
///
/// Adding the offset to a square index in the *player's own* index
/// space yields the neighbouring square in that direction, provided it
/// does not fall off the board or wrap around to the opposite file
/// (see [`Square::step`]). The knight's hop is not a ray and has eight
/// offsets of its own.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, VariantArray, EnumIs)]
#[repr(u8)]
pub enum Direction {
    FORWARD = 0,
    BACKWARD = 1,
    LEFT = 2,
    RIGHT = 3,
    FWD_LEFT_DIAG = 4,
    FWD_RIGHT_DIAG = 5,
    BACK_LEFT_DIAG = 6,
    BACK_RIGHT_DIAG = 7,
    KNIGHT_HOP = 8,
}

impl Direction {
    /// The eight straight-line directions.
    pub const RAYS: [Direction; 8] = [
        Self::FORWARD,
        Self::FWD_RIGHT_DIAG,
        Self::RIGHT,
        Self::BACK_RIGHT_DIAG,
        Self::BACKWARD,
        Self::BACK_LEFT_DIAG,
        Self::LEFT,
        Self::FWD_LEFT_DIAG,
    ];

    /// Offsets of the knight's hop, in any index space.
    pub const KNIGHT_OFFSETS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];

    /// Use as an array index.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// Index offset of one step in this direction. Zero for the knight hop.
    #[inline]
    pub fn offset(self) -> i8 {
        let (dc, dr) = self.delta();
        dc + 8 * dr
    }

    /// Expected (column, row) change of one step in this direction.
    #[inline]
    pub fn delta(self) -> (i8, i8) {
        match self {
            Self::FORWARD => (0, 1),
            Self::BACKWARD => (0, -1),
            Self::LEFT => (-1, 0),
            Self::RIGHT => (1, 0),
            Self::FWD_LEFT_DIAG => (-1, 1),
            Self::FWD_RIGHT_DIAG => (1, 1),
            Self::BACK_LEFT_DIAG => (-1, -1),
            Self::BACK_RIGHT_DIAG => (1, -1),
            Self::KNIGHT_HOP => (0, 0),
        }
    }

    #[inline]
    pub fn is_orthogonal(self) -> bool {
        matches!(
            self,
            Self::FORWARD | Self::BACKWARD | Self::LEFT | Self::RIGHT
        )
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::FWD_LEFT_DIAG | Self::FWD_RIGHT_DIAG | Self::BACK_LEFT_DIAG | Self::BACK_RIGHT_DIAG
        )
    }

    /// The pawn's capture directions.
    #[inline]
    pub fn is_forward_diagonal(self) -> bool {
        matches!(self, Self::FWD_LEFT_DIAG | Self::FWD_RIGHT_DIAG)
    }

    /// Classify a (column, row) displacement, as seen by one player.
    ///
    /// Any displacement with both components nonzero counts as diagonal,
    /// so knight moves come out as the diagonal they lean towards.
    pub fn from_delta(dc: i8, dr: i8) -> Option<Self> {
        use std::cmp::Ordering::*;
        match (dc.cmp(&0), dr.cmp(&0)) {
            (Equal, Equal) => None,
            (Equal, Greater) => Some(Self::FORWARD),
            (Equal, Less) => Some(Self::BACKWARD),
            (Less, Equal) => Some(Self::LEFT),
            (Greater, Equal) => Some(Self::RIGHT),
            (Less, Greater) => Some(Self::FWD_LEFT_DIAG),
            (Greater, Greater) => Some(Self::FWD_RIGHT_DIAG),
            (Less, Less) => Some(Self::BACK_LEFT_DIAG),
            (Greater, Less) => Some(Self::BACK_RIGHT_DIAG),
        }
    }
}

/// Representation of the sides of castling.
///
/// The discriminant values are used as array indexes.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, VariantArray, Serialize)]
#[repr(u8)]
pub enum CastlingSide {
    /// Aka. the 'long' castling, towards the a-file.
    QUEEN = 0,
    /// Aka. the 'short' castling, towards the h-file.
    KING = 1,
}

impl CastlingSide {
    /// Use as an array index.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// The lateral direction the king travels, from its owner's point
    /// of view. Black sees the board rotated, so its queen side is on
    /// its right.
    #[inline]
    pub fn direction(self, col: ChessColor) -> Direction {
        match (self, col) {
            (Self::QUEEN, ChessColor::WHITE) | (Self::KING, ChessColor::BLACK) => Direction::LEFT,
            (Self::KING, ChessColor::WHITE) | (Self::QUEEN, ChessColor::BLACK) => Direction::RIGHT,
        }
    }
}

/// Representation of a move request on a chessboard.
///
/// The promotion is kept as a full [`ChessPiece`] so that a request
/// naming a pawn or king can be turned away with a proper error rather
/// than being unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<ChessPiece>,
}

impl ChessMove {
    #[inline]
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    pub fn promoting(from: Square, to: Square, ech: PawnPromotion) -> Self {
        Self {
            from,
            to,
            promotion: Some(ech.into()),
        }
    }
}

/// A move that follows the piece's movement rules but has not been
/// checked against the mover's king safety.
///
/// Provided as syntactic salt for the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PseudoLegal(pub ChessMove);

/// Wrapper for moves that have been verified legal, that is
/// they do not result in the moving player's king being in check
/// after the move is made.
///
/// Provided as syntactic salt for the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct LegalMove(pub ChessMove);

/// The en-passant opportunity left by a double pawn push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnPassant {
    /// Square skipped over by the advancing pawn, upon which
    /// en-passant capture is possible.
    pub target: Square,
    /// Square the advancing pawn landed on, which is vacated by
    /// an en-passant capture.
    pub creator: Square,
}

#[test]
fn chessman_roundtrip() {
    use strum::VariantArray;
    for cm in ChessMan::VARIANTS {
        assert_eq!(ChessMan::new(cm.col(), cm.ech()), *cm);
    }
}

#[test]
fn direction_offsets() {
    assert_eq!(Direction::FORWARD.offset(), 8);
    assert_eq!(Direction::BACKWARD.offset(), -8);
    assert_eq!(Direction::LEFT.offset(), -1);
    assert_eq!(Direction::RIGHT.offset(), 1);
    assert_eq!(Direction::FWD_LEFT_DIAG.offset(), 7);
    assert_eq!(Direction::FWD_RIGHT_DIAG.offset(), 9);
    assert_eq!(Direction::BACK_LEFT_DIAG.offset(), -9);
    assert_eq!(Direction::BACK_RIGHT_DIAG.offset(), -7);
}

#[test]
fn promotion_subset() {
    assert_eq!(PawnPromotion::try_from(ChessPiece::QUEEN), Ok(PawnPromotion::QUEEN));
    assert_eq!(PawnPromotion::try_from(ChessPiece::KING), Err(ChessPiece::KING));
    assert_eq!(PawnPromotion::try_from(ChessPiece::PAWN), Err(ChessPiece::PAWN));
    assert_eq!(ChessPiece::from(PawnPromotion::ROOK), ChessPiece::ROOK);
}
