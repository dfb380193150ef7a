//! # Making moves
//!
//! [`ChessBoard::apply_move`] validates a move request, then
//! [`ChessBoard::make_move`] carries it out and reports every square
//! whose occupant changed. The move's special nature (castling, en
//! passant, double step, promotion) is recognised from the board and
//! the squares alone.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    error::ChessError,
    model::{
        ChessMan, ChessMove, ChessPiece, Direction, EnPassant, LegalMove,
        PawnPromotion, Square, castling::CastlingRules, chessman::Piece, mailbox::ChessBoard,
    },
};

/// Every square whose occupant changed in a move, with its new occupant.
///
/// A plain move or capture touches 2 squares, an en-passant capture 3
/// and castling 4. Squares appear in the order they were touched;
/// equality ignores that order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct MoveResult(pub IndexMap<Square, Option<ChessMan>>);

impl MoveResult {
    #[inline]
    fn touch(&mut self, sq: Square, occupant: Option<ChessMan>) {
        self.0.insert(sq, occupant);
    }

    /// `Some(occupant)` if the square changed.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Option<ChessMan>> {
        self.0.get(&sq).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(Square, Option<ChessMan>); N]> for MoveResult {
    fn from(value: [(Square, Option<ChessMan>); N]) -> Self {
        Self(IndexMap::from(value))
    }
}

/// What became of a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    /// The move was carried out.
    Applied(MoveResult),
    /// A pawn would reach the last rank, but no promotion was named.
    /// Nothing has changed on the board; ask again with a promotion.
    PromotionPending { from: Square, to: Square },
}

impl MoveOutcome {
    pub fn applied(&self) -> Option<&MoveResult> {
        match self {
            Self::Applied(res) => Some(res),
            Self::PromotionPending { .. } => None,
        }
    }
}

impl ChessBoard {
    /// Validate and carry out a move.
    ///
    /// Fails without touching the board if `from` is empty, if `to` is
    /// not a legal destination, or if the promotion is missing-in-kind
    /// or given where no promotion happens. A promoting move without a
    /// promotion is reported as [`MoveOutcome::PromotionPending`].
    ///
    /// Whose turn it is, is not checked here; see
    /// [`Game`](crate::model::game::Game) for that.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<ChessPiece>,
    ) -> Result<MoveOutcome, ChessError> {
        let piece = *self.piece(from).ok_or(ChessError::EmptySquare(from))?;

        if !self.is_legal(from, to) {
            return Err(ChessError::IllegalMove { from, to });
        }

        let promoting = piece.ech == ChessPiece::PAWN && to.column_row(piece.col).1 == 7;

        let promotion = match (promoting, promotion) {
            (false, None) => None,
            (false, Some(ech)) => {
                return Err(ChessError::InvalidPromotionKind(format!(
                    "{from}{to} is not a promotion, but {ech:?} was requested"
                )));
            }
            (true, None) => return Ok(MoveOutcome::PromotionPending { from, to }),
            (true, Some(ech)) => Some(PawnPromotion::try_from(ech).map_err(|ech| {
                ChessError::InvalidPromotionKind(format!("cannot promote to {ech:?}"))
            })?),
        };

        let mv = ChessMove {
            from,
            to,
            promotion: promotion.map(ChessPiece::from),
        };
        Ok(MoveOutcome::Applied(self.make_move(LegalMove(mv))))
    }

    /// Carry out a move known to be legal.
    ///
    /// The en-passant state is cleared first and only re-set if this
    /// move is a double step. A promotion on a non-promoting move, or a
    /// missing one on a promoting move, is ignored.
    pub fn make_move(&mut self, mv: LegalMove) -> MoveResult {
        let LegalMove(mv) = mv;
        let mut res = MoveResult::default();

        let prior = self.en_passant.take();
        let Some(mut piece) = self.remove(mv.from) else {
            return res;
        };
        let col = piece.col;
        res.touch(mv.from, None);

        let (dir, dc, dr) = mv
            .from
            .direction_to(mv.to, col)
            .unwrap_or((Direction::FORWARD, 0, 0));

        if piece.ech == ChessPiece::PAWN {
            if let Some(ep) = prior.filter(|ep| ep.target == mv.to && dc != 0) {
                if self
                    .piece(ep.creator)
                    .is_some_and(|p| p.ech == ChessPiece::PAWN && p.col != col)
                {
                    self.remove(ep.creator);
                    res.touch(ep.creator, None);
                }
            }

            if dr == 2 {
                if let Some(target) = mv.from.step(Direction::FORWARD, col) {
                    self.en_passant = Some(EnPassant {
                        target,
                        creator: mv.to,
                    });
                }
            }
        }

        if piece.ech == ChessPiece::KING {
            let rules = &CastlingRules::STANDARD;
            if let Some(side) = rules.side_of(col, mv.from, mv.to).filter(|_| dc.abs() == 2) {
                let rook_from = rules.rook_start[col.ix()][side.ix()];
                let rook_to = rules.rook_end[col.ix()][side.ix()];
                if let Some(rook) = self.remove(rook_from) {
                    res.touch(rook_from, None);
                    res.touch(rook_to, Some(rook.man()));
                    self.place(rook_to, rook);
                }
            }
            self.rights.revoke_all(col);
        }

        self.rights.touch(mv.from);
        self.rights.touch(mv.to);

        piece.mark_moved(dir);
        let promoted = (piece.ech == ChessPiece::PAWN && mv.to.column_row(col).1 == 7)
            .then(|| mv.promotion.and_then(|ech| PawnPromotion::try_from(ech).ok()))
            .flatten();
        if let Some(ech) = promoted {
            piece = Piece::moved(col, ech.into());
        }

        res.touch(mv.to, Some(piece.man()));
        self.place(mv.to, piece);
        self.active = col.opp();

        res
    }
}

#[cfg(test)]
use crate::model::{CastlingSide, ChessColor};

#[cfg(test)]
fn board(fen: &str) -> ChessBoard {
    ChessBoard::from_fen(fen).expect("valid fen")
}

#[test]
fn plain_move_and_capture() {
    use Square::*;
    let mut b = ChessBoard::startpos();
    let res = b.apply_move(g1, f3, None).expect("legal");
    assert_eq!(
        res,
        MoveOutcome::Applied(MoveResult::from([(g1, None), (f3, Some(ChessMan::WHITE_KNIGHT))]))
    );
    assert_eq!(b.active(), ChessColor::BLACK);

    let mut b = board("8/8/8/3p4/4P3/8/8/8 w - -");
    let res = b.apply_move(e4, d5, None).expect("legal");
    assert_eq!(res.applied().map(MoveResult::len), Some(2));
    assert_eq!(b.man(d5), Some(ChessMan::WHITE_PAWN));
}

#[test]
fn errors_leave_board_untouched() {
    use Square::*;
    let mut b = ChessBoard::startpos();
    let before = b.clone();
    assert_eq!(b.apply_move(e4, e5, None), Err(ChessError::EmptySquare(e4)));
    assert_eq!(
        b.apply_move(e2, e5, None),
        Err(ChessError::IllegalMove { from: e2, to: e5 })
    );
    assert!(matches!(
        b.apply_move(e2, e4, Some(ChessPiece::QUEEN)),
        Err(ChessError::InvalidPromotionKind(_))
    ));
    assert_eq!(b, before);
}

#[test]
fn double_step_sets_and_next_move_clears_en_passant() {
    use Square::*;
    let mut b = ChessBoard::startpos();
    b.apply_move(e2, e4, None).expect("legal");
    assert_eq!(b.en_passant(), Some(EnPassant { target: e3, creator: e4 }));
    b.apply_move(g8, f6, None).expect("legal");
    assert_eq!(b.en_passant(), None);
    assert_eq!(
        b.piece(e4).and_then(|p| p.reach.get(Direction::FORWARD)),
        Some(crate::model::chessman::Steps::Bounded(1))
    );
}

#[test]
fn promotion_is_gated() {
    use Square::*;
    let mut b = board("7k/P7/8/8/8/8/8/K7 w - -");
    let before = b.clone();
    assert_eq!(
        b.apply_move(a7, a8, None),
        Ok(MoveOutcome::PromotionPending { from: a7, to: a8 })
    );
    assert_eq!(b, before);
    assert!(matches!(
        b.apply_move(a7, a8, Some(ChessPiece::KING)),
        Err(ChessError::InvalidPromotionKind(_))
    ));
    assert!(matches!(
        b.apply_move(a7, a8, Some(ChessPiece::PAWN)),
        Err(ChessError::InvalidPromotionKind(_))
    ));
    let res = b.apply_move(a7, a8, Some(ChessPiece::KNIGHT)).expect("legal");
    assert_eq!(
        res,
        MoveOutcome::Applied(MoveResult::from([(a7, None), (a8, Some(ChessMan::WHITE_KNIGHT))]))
    );
    assert_eq!(b.man(a8), Some(ChessMan::WHITE_KNIGHT));
}

#[test]
fn castling_moves_both_pieces() {
    use Square::*;
    let mut b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -");
    let res = b.apply_move(e1, g1, None).expect("legal");
    assert_eq!(
        res,
        MoveOutcome::Applied(MoveResult::from([
            (e1, None),
            (h1, None),
            (f1, Some(ChessMan::WHITE_ROOK)),
            (g1, Some(ChessMan::WHITE_KING)),
        ]))
    );
    assert!(!b.rights().has(ChessColor::WHITE, CastlingSide::QUEEN));
    assert!(b.rights().has(ChessColor::BLACK, CastlingSide::QUEEN));

    let res = b.apply_move(e8, c8, None).expect("legal");
    assert_eq!(res.applied().map(MoveResult::len), Some(4));
    assert_eq!(b.man(d8), Some(ChessMan::BLACK_ROOK));
    assert_eq!(b.man(c8), Some(ChessMan::BLACK_KING));
    assert_eq!(b.king(ChessColor::BLACK), Some(c8));
}

#[test]
fn capturing_a_home_rook_revokes_its_right() {
    use Square::*;
    let mut b = board("r3k2r/8/8/8/8/8/6B1/R3K2R w KQkq -");
    b.apply_move(g2, a8, None).expect("legal");
    assert!(!b.rights().has(ChessColor::BLACK, CastlingSide::QUEEN));
    assert!(b.rights().has(ChessColor::BLACK, CastlingSide::KING));
    assert!(!b.legal_moves(e8).contains(&c8));
}
