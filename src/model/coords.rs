//! # Perspective coordinates
//!
//! Every player sees the board from their own side. White's index of
//! a square is its [`Square`] discriminant; Black's is the same board
//! rotated 180 degrees, so that stepping [`Direction::FORWARD`] is `+8`
//! for both players and "left" is always towards the player's own left
//! hand.
//!
//! Adding an offset to an index is not enough to find a neighbour: a
//! step right from the h-file lands on the a-file one rank up. Every
//! step therefore re-derives column and row of both ends and rejects
//! the candidate unless the column moved by exactly the expected amount.

use crate::model::{ChessColor, Direction, Square};

impl Square {
    /// Index of this square in `pov`'s own index space.
    #[inline]
    pub fn index(self, pov: ChessColor) -> u8 {
        match pov {
            ChessColor::WHITE => self as u8,
            ChessColor::BLACK => self.rotate() as u8,
        }
    }

    /// Square at an index of `pov`'s own index space, if on the board.
    #[inline]
    pub fn at_index(ix: i8, pov: ChessColor) -> Option<Self> {
        if !(0..64).contains(&ix) {
            return None;
        }
        let sq = Self::from_u8(ix as u8);
        Some(match pov {
            ChessColor::WHITE => sq,
            ChessColor::BLACK => sq.rotate(),
        })
    }

    /// Zero-based (column, row) of this square as seen by `pov`.
    ///
    /// `(1, 1)` is b2 for White but g7 for Black.
    #[inline]
    pub fn column_row(self, pov: ChessColor) -> (i8, i8) {
        let ix = self.index(pov) as i8;
        (ix & 0x7, ix >> 3)
    }

    /// One step in a straight-line direction, as seen by `pov`.
    ///
    /// Returns `None` for [`Direction::KNIGHT_HOP`], for steps off the
    /// board and for steps that would wrap around an edge file.
    pub fn step(self, dir: Direction, pov: ChessColor) -> Option<Self> {
        if dir == Direction::KNIGHT_HOP {
            return None;
        }

        let ix = self.index(pov) as i8;
        let next = Self::at_index(ix + dir.offset(), pov)?;

        let (c0, _) = self.column_row(pov);
        let (c1, _) = next.column_row(pov);
        if c1 - c0 != dir.delta().0 {
            return None;
        }

        Some(next)
    }

    /// Successive squares in a direction, up to `limit` of them or
    /// the edge of the board, whichever comes first.
    pub fn ray(self, dir: Direction, pov: ChessColor, limit: u8) -> Ray {
        Ray {
            at: self,
            dir,
            pov,
            left: limit,
        }
    }

    /// The (up to) eight squares a knight could hop to from here.
    pub fn knight_hops(self, pov: ChessColor) -> impl Iterator<Item = Square> {
        let ix = self.index(pov) as i8;
        let (c0, r0) = self.column_row(pov);
        Direction::KNIGHT_OFFSETS
            .into_iter()
            .filter_map(move |off| {
                let next = Self::at_index(ix + off, pov)?;
                let (c1, r1) = next.column_row(pov);
                (r1 != r0 && (c1 - c0).abs() <= 2).then_some(next)
            })
    }

    /// Classify the displacement from `self` to `to` as seen by `pov`.
    pub fn direction_to(self, to: Square, pov: ChessColor) -> Option<(Direction, i8, i8)> {
        let (c0, r0) = self.column_row(pov);
        let (c1, r1) = to.column_row(pov);
        let (dc, dr) = (c1 - c0, r1 - r0);
        Direction::from_delta(dc, dr).map(|d| (d, dc, dr))
    }
}

/// Iterator over a straight line of squares, see [`Square::ray`].
#[derive(Debug, Clone)]
pub struct Ray {
    at: Square,
    dir: Direction,
    pov: ChessColor,
    left: u8,
}

impl Iterator for Ray {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.left == 0 {
            return None;
        }
        self.left -= 1;
        self.at = self.at.step(self.dir, self.pov)?;
        Some(self.at)
    }
}

#[test]
fn perspective_bijection() {
    use strum::IntoEnumIterator;
    for pov in [ChessColor::WHITE, ChessColor::BLACK] {
        for sq in Square::iter() {
            assert_eq!(Square::at_index(sq.index(pov) as i8, pov), Some(sq));
        }
    }
}

#[test]
fn perspective_orientation() {
    assert_eq!(Square::b2.column_row(ChessColor::WHITE), (1, 1));
    assert_eq!(Square::g7.column_row(ChessColor::BLACK), (1, 1));
    assert_eq!(
        Square::e2.step(Direction::FORWARD, ChessColor::WHITE),
        Some(Square::e3)
    );
    assert_eq!(
        Square::e7.step(Direction::FORWARD, ChessColor::BLACK),
        Some(Square::e6)
    );
    assert_eq!(
        Square::e8.step(Direction::LEFT, ChessColor::BLACK),
        Some(Square::f8)
    );
}

#[test]
fn wraparound_guard() {
    use ChessColor::*;
    assert_eq!(Square::h1.step(Direction::RIGHT, WHITE), None);
    assert_eq!(Square::a2.step(Direction::LEFT, WHITE), None);
    assert_eq!(Square::h4.step(Direction::FWD_RIGHT_DIAG, WHITE), None);
    assert_eq!(Square::a4.step(Direction::BACK_LEFT_DIAG, WHITE), None);
    assert_eq!(Square::a8.step(Direction::RIGHT, BLACK), None);
    assert_eq!(Square::h8.step(Direction::FORWARD, WHITE), None);
    assert_eq!(Square::a1.ray(Direction::RIGHT, WHITE, 7).count(), 7);
    assert_eq!(Square::d4.ray(Direction::FWD_LEFT_DIAG, WHITE, 7).count(), 3);
}

#[test]
fn knight_hops_clip() {
    use ChessColor::*;
    let mut hops: Vec<_> = Square::a1.knight_hops(WHITE).collect();
    hops.sort();
    assert_eq!(hops, vec![Square::c2, Square::b3]);
    assert_eq!(Square::h8.knight_hops(BLACK).count(), 2);
    assert_eq!(Square::d4.knight_hops(WHITE).count(), 8);
    assert_eq!(Square::g1.knight_hops(WHITE).count(), 3);
}
