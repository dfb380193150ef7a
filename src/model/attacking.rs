//! # Check detection
//!
//! Whether a square is attacked is answered by looking *outwards* from
//! it: along each of the eight rays to the first occupied square, and at
//! the eight knight squares. This only needs to know what is on a
//! square, so a hypothetical position can be examined by putting a
//! [`GhostOverlay`] in front of the real board instead of making and
//! unmaking moves.

use crate::model::{ChessColor, ChessMan, ChessPiece, Direction, Square, mailbox::ChessBoard};

/// A handful of squares whose occupancy is overridden for the duration
/// of a single query.
///
/// Lookups consult the overlay first and fall through to the board.
/// The overlay is a value, never stored on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostOverlay {
    ghosts: [Option<(Square, Option<ChessMan>)>; 4],
}

impl GhostOverlay {
    pub const EMPTY: GhostOverlay = GhostOverlay { ghosts: [None; 4] };

    /// Pretend `sq` is empty.
    #[inline]
    pub fn vacate(self, sq: Square) -> Self {
        self.with(sq, None)
    }

    /// Pretend `sq` holds `man`.
    #[inline]
    pub fn occupy(self, sq: Square, man: ChessMan) -> Self {
        self.with(sq, Some(man))
    }

    /// Later entries for the same square shadow earlier ones.
    ///
    /// # Panics
    ///
    /// On more than four entries, which no single move needs.
    fn with(mut self, sq: Square, occupant: Option<ChessMan>) -> Self {
        if let Some(slot) = self
            .ghosts
            .iter_mut()
            .find(|g| matches!(g, Some((s, _)) if *s == sq))
        {
            *slot = Some((sq, occupant));
            return self;
        }
        let slot = self
            .ghosts
            .iter_mut()
            .find(|g| g.is_none())
            .expect("ghost overlay holds at most four squares");
        *slot = Some((sq, occupant));
        self
    }

    /// `Some(occupant)` if the overlay has an opinion about `sq`.
    #[inline]
    pub fn lookup(&self, sq: Square) -> Option<Option<ChessMan>> {
        self.ghosts.iter().flatten().find(|(s, _)| *s == sq).map(|(_, o)| *o)
    }
}

impl Default for GhostOverlay {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Whether an enemy `ech` found `dist` squares away along `dir` attacks
/// the square the ray was cast from.
#[inline]
fn threatens(ech: ChessPiece, dir: Direction, dist: u8) -> bool {
    match ech {
        ChessPiece::ROOK => dir.is_orthogonal(),
        ChessPiece::BISHOP => dir.is_diagonal(),
        ChessPiece::QUEEN => true,
        ChessPiece::KING => dist == 1,
        ChessPiece::PAWN => dist == 1 && dir.is_forward_diagonal(),
        ChessPiece::KNIGHT => false,
    }
}

impl ChessBoard {
    /// What stands on `sq`, as far as a simulation is concerned.
    #[inline]
    pub fn occupant(&self, sq: Square, ghosts: &GhostOverlay) -> Option<ChessMan> {
        match ghosts.lookup(sq) {
            Some(ghost) => ghost,
            None => self.man(sq),
        }
    }

    /// First occupied square along a ray, with its distance.
    pub fn nearest(
        &self,
        from: Square,
        dir: Direction,
        pov: ChessColor,
        ghosts: &GhostOverlay,
    ) -> Option<(Square, ChessMan, u8)> {
        from.ray(dir, pov, 7)
            .zip(1..)
            .find_map(|(sq, dist)| self.occupant(sq, ghosts).map(|man| (sq, man, dist)))
    }

    /// Whether a king of color `col` standing on `at` would be in check,
    /// with `ghosts` overriding the board.
    ///
    /// Rays are cast in `col`'s own orientation, so an enemy pawn only
    /// counts when it sits one step diagonally *forward*.
    pub fn is_check_at(&self, col: ChessColor, at: Square, ghosts: &GhostOverlay) -> bool {
        for dir in Direction::RAYS {
            if let Some((_, man, dist)) = self.nearest(at, dir, col, ghosts) {
                if man.col() != col && threatens(man.ech(), dir, dist) {
                    return true;
                }
            }
        }

        at.knight_hops(col).any(|sq| {
            self.occupant(sq, ghosts)
                .is_some_and(|man| man.col() != col && man.ech() == ChessPiece::KNIGHT)
        })
    }

    /// The overlay that pretends `from → to` has been played, including
    /// removal of a pawn taken en passant.
    pub fn ghosts_for(&self, from: Square, to: Square) -> Option<GhostOverlay> {
        let piece = self.piece(from)?;
        let mut ghosts = GhostOverlay::EMPTY.vacate(from).occupy(to, piece.man());
        if let Some(ep) = self.en_passant_capture(from, to) {
            ghosts = ghosts.vacate(ep.creator);
        }
        Some(ghosts)
    }

    /// Whether playing `from → to` leaves the mover's own king safe.
    ///
    /// Does not check that the move is geometrically possible; see
    /// [`ChessBoard::legal_moves`] for that.
    pub fn keeps_king_safe(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.piece(from) else {
            return false;
        };
        let Some(ghosts) = self.ghosts_for(from, to) else {
            return false;
        };

        if piece.ech == ChessPiece::KING {
            return !self.is_check_at(piece.col, to, &ghosts);
        }

        match self.king(piece.col) {
            Some(king) => !self.is_check_at(piece.col, king, &ghosts),
            None => true,
        }
    }
}

#[test]
fn ghost_overlay_shadows() {
    let g = GhostOverlay::EMPTY
        .vacate(Square::e2)
        .occupy(Square::e4, ChessMan::WHITE_PAWN)
        .vacate(Square::e4);
    assert_eq!(g.lookup(Square::e2), Some(None));
    assert_eq!(g.lookup(Square::e4), Some(None));
    assert_eq!(g.lookup(Square::e3), None);
}

#[test]
fn pawn_attacks_only_forward() {
    let board = ChessBoard::from_fen("8/8/8/8/3p4/4K3/8/8 w - -").expect("valid fen");
    let none = GhostOverlay::EMPTY;
    assert!(board.is_check(ChessColor::WHITE));
    assert!(board.is_check_at(ChessColor::WHITE, Square::c3, &none));
    assert!(!board.is_check_at(ChessColor::WHITE, Square::d3, &none));
    assert!(!board.is_check_at(ChessColor::WHITE, Square::e5, &none));
    assert!(!board.is_check_at(ChessColor::WHITE, Square::e3, &none.vacate(Square::d4)));

    let board = ChessBoard::from_fen("8/8/8/8/8/8/1p6/K7 w - -").expect("valid fen");
    assert!(board.is_check(ChessColor::WHITE));
}

#[test]
fn ghost_blocks_and_unblocks() {
    let board = ChessBoard::from_fen("4r3/8/8/8/8/8/4B3/4K3 w - -").expect("valid fen");
    assert!(!board.is_check(ChessColor::WHITE));
    let king = Square::e1;
    let ghosts = GhostOverlay::EMPTY
        .vacate(Square::e2)
        .occupy(Square::d3, ChessMan::WHITE_BISHOP);
    assert!(board.is_check_at(ChessColor::WHITE, king, &ghosts));
    assert!(!board.keeps_king_safe(Square::e2, Square::d3));
    assert!(board.keeps_king_safe(Square::e1, Square::d1));
}

#[test]
fn knight_check() {
    let board = ChessBoard::from_fen("8/8/8/8/8/5n2/8/4K3 w - -").expect("valid fen");
    assert!(board.is_check(ChessColor::WHITE));
    let ghosts = GhostOverlay::EMPTY.occupy(Square::f3, ChessMan::WHITE_QUEEN);
    assert!(!board.is_check_at(ChessColor::WHITE, Square::e1, &ghosts));
}
