//! # Zobrist hashing
//!
//! A position key is the XOR of one random number per feature of the
//! position: each chessman on its square, each castle right held, the
//! file of a capturable en-passant square, and Black being on the move.
//! Equal positions, in the sense of the repetition rule, get equal keys.

use std::sync::LazyLock;

use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};

use crate::model::{
    CastlingSide, ChessColor, ChessPiece, Direction, Square, mailbox::ChessBoard,
};

/// Deterministic source of randomness, so that keys are stable between
/// runs.
pub fn pi_rng() -> SmallRng {
    SmallRng::from_seed(*b"3.141592653589793238462643383279")
}

#[derive(Debug, Clone)]
pub struct ZobristTables {
    pub men: [[u64; 64]; 6],
    pub colors: [[u64; 64]; 2],
    pub ep_files: [u64; 8],
    pub rights: [[u64; 2]; 2],
    pub black_to_move: u64,
}

static ZOBRIST: LazyLock<ZobristTables> = LazyLock::new(ZobristTables::new);

impl ZobristTables {
    fn new() -> Self {
        let mut pi = pi_rng();

        let mut men = [[0; 64]; 6];
        for piece in &mut men {
            pi.fill(&mut piece[..]);
        }

        let mut colors = [[0; 64]; 2];
        for color in &mut colors {
            pi.fill(&mut color[..]);
        }

        let mut ep_files = [0; 8];
        pi.fill(&mut ep_files[..]);

        let rights = [[pi.next_u64(), pi.next_u64()], [pi.next_u64(), pi.next_u64()]];

        Self {
            men,
            colors,
            ep_files,
            rights,
            black_to_move: pi.next_u64(),
        }
    }

    /// The process-wide tables.
    fn global() -> &'static Self {
        &ZOBRIST
    }

    #[inline]
    pub fn hash_square(&self, col: ChessColor, ech: ChessPiece, sq: Square) -> u64 {
        self.men[ech.ix()][sq.ix()] ^ self.colors[col.ix()][sq.ix()]
    }
}

impl ChessBoard {
    /// The Zobrist key of this position.
    pub fn zobrist(&self) -> u64 {
        let zt = ZobristTables::global();
        let mut res = 0;

        for col in [ChessColor::WHITE, ChessColor::BLACK] {
            for sq in self.squares_of(col) {
                if let Some(piece) = self.piece(sq) {
                    res ^= zt.hash_square(col, piece.ech, sq);
                }
            }
            for side in [CastlingSide::QUEEN, CastlingSide::KING] {
                if self.rights().has(col, side) {
                    res ^= zt.rights[col.ix()][side.ix()];
                }
            }
        }

        if self.en_passant_is_live() {
            if let Some(ep) = self.en_passant() {
                res ^= zt.ep_files[ep.target.ix() & 0x7];
            }
        }

        if self.active() == ChessColor::BLACK {
            res ^= zt.black_to_move;
        }

        res
    }

    /// Whether a pawn of the player to move stands ready to capture en
    /// passant. A recorded target nobody can use does not distinguish
    /// positions.
    fn en_passant_is_live(&self) -> bool {
        let Some(ep) = self.en_passant() else {
            return false;
        };
        [Direction::LEFT, Direction::RIGHT]
            .into_iter()
            .filter_map(|dir| ep.creator.step(dir, ChessColor::WHITE))
            .any(|sq| {
                self.piece(sq)
                    .is_some_and(|p| p.col == self.active() && p.ech == ChessPiece::PAWN)
                    && self.en_passant_capture(sq, ep.target).is_some()
            })
    }
}

#[test]
fn tables_are_deterministic() {
    let a = ZobristTables::new();
    let b = ZobristTables::new();
    assert_eq!(a.men, b.men);
    assert_eq!(a.black_to_move, b.black_to_move);
    assert_ne!(a.black_to_move, 0);
    assert_eq!(ZobristTables::global().colors, a.colors);
}

#[test]
fn keys_distinguish_positions() {
    let start = ChessBoard::startpos();
    assert_eq!(start.zobrist(), ChessBoard::startpos().zobrist());

    let black = ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq -")
        .expect("valid fen");
    assert_ne!(start.zobrist(), black.zobrist());

    let no_rights = ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kkq -")
        .expect("valid fen");
    assert_ne!(start.zobrist(), no_rights.zobrist());
}

#[test]
fn dead_en_passant_is_not_hashed() {
    let with = ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3")
        .expect("valid fen");
    let without = ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq -")
        .expect("valid fen");
    assert_eq!(with.zobrist(), without.zobrist());

    let with = ChessBoard::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3").expect("valid fen");
    let without = ChessBoard::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - -").expect("valid fen");
    assert_ne!(with.zobrist(), without.zobrist());
}
