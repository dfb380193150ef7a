//! # Chessmen and their reach.
//!
//! A [`Piece`] is one concrete chessman standing on the board: its
//! color, its type and a [`Reach`] table saying how far it may travel in
//! each [`Direction`]. Pawns and kings carry first-move privileges in
//! that table (the double step and the castling step) which are given up
//! the first time the piece moves, see [`Piece::mark_moved`].

use crate::model::{ChessColor, ChessMan, ChessPiece, Direction};

/// How far a piece can travel in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Steps {
    /// At most this many squares.
    Bounded(u8),
    /// Until blocked or the edge of the board.
    Unlimited,
    /// The knight's hop, which is not a ray.
    Hop,
}

impl Steps {
    /// Maximum number of squares travelled along a ray.
    #[inline]
    pub fn limit(self) -> u8 {
        match self {
            Self::Bounded(n) => n,
            Self::Unlimited => 7,
            Self::Hop => 0,
        }
    }
}

/// Per-direction reach, indexed by [`Direction::ix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Reach([Option<Steps>; 9]);

impl Reach {
    #[inline]
    pub fn get(&self, dir: Direction) -> Option<Steps> {
        self.0[dir.ix()]
    }

    #[inline]
    pub fn set(&mut self, dir: Direction, steps: Option<Steps>) {
        self.0[dir.ix()] = steps
    }

    fn with(mut self, dirs: &[Direction], steps: Steps) -> Self {
        for dir in dirs {
            self.set(*dir, Some(steps));
        }
        self
    }

    /// All directions with some reach, in [`Direction`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Steps)> + '_ {
        use strum::VariantArray;
        Direction::VARIANTS
            .iter()
            .filter_map(|d| self.get(*d).map(|s| (*d, s)))
    }
}

/// The reach of a piece that has never moved.
pub fn base_reach(ech: ChessPiece) -> Reach {
    use Direction::*;
    use Steps::*;

    const ORTHOGONAL: [Direction; 4] = [FORWARD, BACKWARD, LEFT, RIGHT];
    const DIAGONAL: [Direction; 4] = [FWD_LEFT_DIAG, FWD_RIGHT_DIAG, BACK_LEFT_DIAG, BACK_RIGHT_DIAG];

    let none = Reach::default();
    match ech {
        ChessPiece::PAWN => none
            .with(&[FORWARD], Bounded(2))
            .with(&[FWD_LEFT_DIAG, FWD_RIGHT_DIAG], Bounded(1)),
        ChessPiece::KNIGHT => none.with(&[KNIGHT_HOP], Hop),
        ChessPiece::BISHOP => none.with(&DIAGONAL, Unlimited),
        ChessPiece::ROOK => none.with(&ORTHOGONAL, Unlimited),
        ChessPiece::QUEEN => none.with(&ORTHOGONAL, Unlimited).with(&DIAGONAL, Unlimited),
        ChessPiece::KING => none
            .with(&ORTHOGONAL, Bounded(1))
            .with(&DIAGONAL, Bounded(1))
            .with(&[LEFT, RIGHT], Bounded(2)),
    }
}

/// A chessman on the board, with its movement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub ech: ChessPiece,
    pub col: ChessColor,
    pub reach: Reach,
}

impl Piece {
    /// A piece that has not moved yet.
    pub fn new(col: ChessColor, ech: ChessPiece) -> Self {
        Self {
            ech,
            col,
            reach: base_reach(ech),
        }
    }

    /// A piece that has already moved at some point.
    pub fn moved(col: ChessColor, ech: ChessPiece) -> Self {
        let mut res = Self::new(col, ech);
        res.mark_moved(Direction::FORWARD);
        res
    }

    #[inline]
    pub fn man(&self) -> ChessMan {
        ChessMan::new(self.col, self.ech)
    }

    /// Give up the first-move privileges after moving in `dir`.
    ///
    /// A pawn loses its double step. A king loses the castling step
    /// towards the side it moved, or both if it moved any other way.
    /// Everything else is unaffected. Idempotent.
    pub fn mark_moved(&mut self, dir: Direction) {
        use Direction::*;
        let one = Some(Steps::Bounded(1));
        match self.ech {
            ChessPiece::PAWN => self.reach.set(FORWARD, one),
            ChessPiece::KING => match dir {
                LEFT | RIGHT => self.reach.set(dir, one),
                _ => {
                    self.reach.set(LEFT, one);
                    self.reach.set(RIGHT, one);
                }
            },
            _ => {}
        }
    }

    /// Whether the king may still take the two-square castling step.
    #[inline]
    pub fn can_castle_towards(&self, dir: Direction) -> bool {
        self.ech == ChessPiece::KING && self.reach.get(dir) == Some(Steps::Bounded(2))
    }
}

impl From<ChessMan> for Piece {
    fn from(value: ChessMan) -> Self {
        Self::new(value.col(), value.ech())
    }
}

#[test]
fn pawn_loses_double_step() {
    let mut p = Piece::new(ChessColor::WHITE, ChessPiece::PAWN);
    assert_eq!(p.reach.get(Direction::FORWARD), Some(Steps::Bounded(2)));
    p.mark_moved(Direction::FORWARD);
    assert_eq!(p.reach.get(Direction::FORWARD), Some(Steps::Bounded(1)));
    assert_eq!(p.reach.get(Direction::BACKWARD), None);
}

#[test]
fn king_loses_castling_step() {
    let mut k = Piece::new(ChessColor::BLACK, ChessPiece::KING);
    k.mark_moved(Direction::LEFT);
    assert!(!k.can_castle_towards(Direction::LEFT));
    assert!(k.can_castle_towards(Direction::RIGHT));

    let mut k = Piece::new(ChessColor::WHITE, ChessPiece::KING);
    k.mark_moved(Direction::FWD_LEFT_DIAG);
    assert!(!k.can_castle_towards(Direction::LEFT));
    assert!(!k.can_castle_towards(Direction::RIGHT));
}

#[test]
fn sliders_are_unlimited() {
    let q = base_reach(ChessPiece::QUEEN);
    assert_eq!(q.iter().count(), 8);
    assert!(q.iter().all(|(_, s)| s == Steps::Unlimited));
    let n = base_reach(ChessPiece::KNIGHT);
    assert_eq!(n.iter().collect::<Vec<_>>(), vec![(Direction::KNIGHT_HOP, Steps::Hop)]);
}
