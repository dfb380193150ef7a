//! # Forsyth-Edwards Notation
//!
//! FEN is the standard way of writing down a chess position. This
//! crate deals in its first four fields, separated by single spaces:
//!
//! - The chessboard
//! - The active player
//! - The castling rights
//! - The en-passant square (if applicable)
//!
//! The chessboard is written out as eight solidus-separated (`/`) ranks,
//! starting with the 8th rank, and then in descending order. Each rank
//! lists its files in a-h order, occupied squares as a letter (upper case
//! for white, lower case for black, `PNBRQK`), and runs of empty squares
//! as a digit 1 ... 8.
//!
//! The active player is `w` or `b`. The castling rights are a subset of
//! `KQkq` in that order, or `-` if there are none. The en-passant square
//! is the square skipped by a pawn which just advanced two squares, or
//! `-`.
//!
//! The trailing halfmove clock and turn number of full six-field FEN are
//! accepted and ignored, and never written.
//!
//! Thus the FEN string of the standard starting position in chess is:
//! ```text
//! rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -
//! ```

use std::sync::LazyLock;

use chumsky::prelude::*;
use regex::Regex;

use crate::{
    error::ChessError,
    model::{
        CastlingSide, ChessColor, ChessMan, ChessPiece, Direction, EnPassant, Square,
        castling::{CastleRights, CastlingRules},
        mailbox::{ChessBoard, Mailbox},
    },
    notation::Parsable,
};

/// The standard starting position.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

/// Cheap structural gate run before the parser proper.
static FEN_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[1-8pnbrqkPNBRQK]+(/[1-8pnbrqkPNBRQK]+){7}",
        r" [wb]",
        r" (-|K?Q?k?q?)",
        r" (-|[a-h][36])",
        r"( [0-9]+ [0-9]+)?$",
    ))
    .expect("FEN pattern is a valid regex")
});

/// The fields of a FEN string, parsed but not yet validated as a
/// position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenBoard {
    pub board: Mailbox<Option<ChessMan>>,
    pub active: ChessColor,
    pub rights: CastleRights,
    pub en_passant: Option<Square>,
    /// Halfmove clock and turn number, when given.
    pub clocks: Option<(u32, u32)>,
}

impl FenBoard {
    pub fn new(
        board: Mailbox<Option<ChessMan>>,
        active: ChessColor,
        rights: CastleRights,
        en_passant: Option<Square>,
        clocks: Option<(u32, u32)>,
    ) -> Self {
        Self {
            board,
            active,
            rights,
            en_passant,
            clocks,
        }
    }

    /// Read the fields of a FEN string.
    pub fn parse(fen: &str) -> Result<Self, ChessError> {
        let fen = fen.trim();
        if !FEN_SHAPE.is_match(fen) {
            return Err(ChessError::MalformedFen(format!(
                "{fen:?} does not have the shape of a FEN string"
            )));
        }
        Self::parser()
            .then_ignore(end())
            .parse(fen)
            .into_result()
            .map_err(|_| ChessError::MalformedFen(format!("{fen:?}: {}", Self::fault(fen))))
    }

    /// Name the field that failed to parse. The shape gate has already
    /// vouched for the active player and en-passant fields.
    fn fault(fen: &str) -> &'static str {
        let fields: Vec<&str> = fen.split(' ').collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or("");

        if fen_board().then_ignore(end()).parse(field(0)).has_errors() {
            "the board does not have eight ranks of eight files"
        } else if fen_castling().then_ignore(end()).parse(field(2)).has_errors() {
            "the castling rights are neither a subset of KQkq nor -"
        } else if fields.len() > 4
            && (fen_number().then_ignore(end()).parse(field(4)).has_errors()
                || fen_number().then_ignore(end()).parse(field(5)).has_errors())
        {
            "the move clocks are out of range"
        } else {
            "not a FEN string"
        }
    }

    /// Check that the fields describe a position that could come up in
    /// a game, and work out the en-passant state.
    pub fn validate(&self) -> Result<Option<EnPassant>, ChessError> {
        let malformed = |msg: String| Err(ChessError::MalformedFen(msg));

        for col in [ChessColor::WHITE, ChessColor::BLACK] {
            let king = ChessMan::new(col, ChessPiece::KING);
            let kings = self.board.squares(|_, m| *m == Some(king));
            if kings.len() > 1 {
                return malformed(format!("{} {col} kings", kings.len()));
            }
        }

        let pawns_on_edge = self.board.squares(|sq, m| {
            m.is_some_and(|m| m.ech() == ChessPiece::PAWN) && matches!(sq.ix() >> 3, 0 | 7)
        });
        if let Some(sq) = pawns_on_edge.first() {
            return malformed(format!("pawn on {sq}"));
        }

        let rules = &CastlingRules::STANDARD;
        for col in [ChessColor::WHITE, ChessColor::BLACK] {
            for side in [CastlingSide::QUEEN, CastlingSide::KING] {
                if !self.rights.has(col, side) {
                    continue;
                }
                let king_sq = rules.king_start[col.ix()];
                let rook_sq = rules.rook_start[col.ix()][side.ix()];
                if *self.board.get(king_sq) != Some(ChessMan::new(col, ChessPiece::KING)) {
                    return malformed(format!("{col} may castle but has no king on {king_sq}"));
                }
                if *self.board.get(rook_sq) != Some(ChessMan::new(col, ChessPiece::ROOK)) {
                    return malformed(format!("{col} may castle but has no rook on {rook_sq}"));
                }
            }
        }

        let Some(target) = self.en_passant else {
            return Ok(None);
        };

        let mover = self.active.opp();
        if target.column_row(mover).1 != 2 {
            return malformed(format!(
                "en-passant square {target} with {} to move",
                self.active
            ));
        }
        if self.board.get(target).is_some() {
            return malformed(format!("en-passant square {target} is occupied"));
        }
        let creator = target.step(Direction::FORWARD, mover);
        match creator {
            Some(creator)
                if *self.board.get(creator) == Some(ChessMan::new(mover, ChessPiece::PAWN)) =>
            {
                Ok(Some(EnPassant { target, creator }))
            }
            _ => malformed(format!("no {mover} pawn in front of en-passant square {target}")),
        }
    }
}

impl Parsable for FenBoard {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        group((
            fen_board().then_ignore(just(' ')),
            ChessColor::parser().then_ignore(just(' ')),
            fen_castling().then_ignore(just(' ')),
            fen_en_passant(),
            fen_clocks().or_not(),
        ))
        .map(|(b, a, r, e, c)| Self::new(b, a, r, e, c))
    }
}

fn fen_rank<'s>() -> impl Parser<'s, &'s str, Vec<Option<ChessMan>>> {
    choice((
        ChessMan::parser().map(|c| vec![Some(c)]),
        one_of("12345678").map(|c: char| vec![None; (c as u8 - b'0') as usize]),
    ))
    .repeated()
    .at_least(1)
    .collect::<Vec<_>>()
    .map(|vv| vv.concat())
    .filter(|v| v.len() == 8)
    .labelled("expected a rank of eight squares")
}

fn fen_board<'s>() -> impl Parser<'s, &'s str, Mailbox<Option<ChessMan>>> {
    fen_rank()
        .separated_by(just('/'))
        .exactly(8)
        .collect::<Vec<_>>()
        .map(|ranks| {
            let mut b = Mailbox::new(None);
            for (i, rank) in ranks.into_iter().enumerate() {
                let row = (7 - i as u8) << 3;
                for (file, man) in rank.into_iter().enumerate() {
                    b.set(Square::from_u8(row | file as u8), man);
                }
            }
            b
        })
        .boxed()
}

fn fen_castling<'s>() -> impl Parser<'s, &'s str, CastleRights> {
    choice((
        just('-').to(CastleRights::NIL),
        group((
            just('K').or_not(),
            just('Q').or_not(),
            just('k').or_not(),
            just('q').or_not(),
        ))
        .try_map(|(wk, wq, bk, bq), _| {
            let mut rights = CastleRights::NIL;
            let letters = [
                (wk, ChessColor::WHITE, CastlingSide::KING),
                (wq, ChessColor::WHITE, CastlingSide::QUEEN),
                (bk, ChessColor::BLACK, CastlingSide::KING),
                (bq, ChessColor::BLACK, CastlingSide::QUEEN),
            ];
            for (letter, col, side) in letters {
                if letter.is_some() {
                    rights.grant(col, side);
                }
            }
            if rights == CastleRights::NIL {
                Err(EmptyErr::default())
            } else {
                Ok(rights)
            }
        }),
    ))
    .labelled("expected castling rights")
}

fn fen_en_passant<'s>() -> impl Parser<'s, &'s str, Option<Square>> {
    choice((just('-').to(None), Square::parser().map(Some)))
}

fn fen_number<'s>() -> impl Parser<'s, &'s str, u32> {
    text::int(10).try_map(|s: &str, _| s.parse::<u32>().map_err(|_| EmptyErr::default()))
}

fn fen_clocks<'s>() -> impl Parser<'s, &'s str, (u32, u32)> {
    just(' ')
        .ignore_then(fen_number())
        .then_ignore(just(' '))
        .then(fen_number())
}

impl ChessBoard {
    /// Set up a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let parsed = FenBoard::parse(fen)?;
        let en_passant = parsed.validate()?;
        Ok(Self::from_mailbox(
            &parsed.board,
            parsed.active,
            parsed.rights,
            en_passant,
        ))
    }

    /// Write the position as four-field FEN.
    pub fn to_fen(&self) -> String {
        let mut res = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut gap = 0;
            for file in 0..8u8 {
                match self.man(Square::from_u8(rank << 3 | file)) {
                    Some(man) => {
                        if gap > 0 {
                            res.push_str(&gap.to_string());
                            gap = 0;
                        }
                        res.push_str(&man.to_string());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                res.push_str(&gap.to_string());
            }
            if rank > 0 {
                res.push('/');
            }
        }

        res.push_str(&format!(" {:#} ", self.active()));

        let rights = self.rights();
        let letters = [
            (ChessColor::WHITE, CastlingSide::KING, 'K'),
            (ChessColor::WHITE, CastlingSide::QUEEN, 'Q'),
            (ChessColor::BLACK, CastlingSide::KING, 'k'),
            (ChessColor::BLACK, CastlingSide::QUEEN, 'q'),
        ];
        let before = res.len();
        for (col, side, c) in letters {
            if rights.has(col, side) {
                res.push(c);
            }
        }
        if res.len() == before {
            res.push('-');
        }

        match self.en_passant() {
            Some(ep) => res.push_str(&format!(" {}", ep.target)),
            None => res.push_str(" -"),
        }

        res
    }
}

#[test]
fn startpos_matches_setup() {
    let b = ChessBoard::from_fen(STARTPOS).expect("valid fen");
    assert_eq!(b, ChessBoard::startpos());
    assert_eq!(ChessBoard::startpos().to_fen(), STARTPOS);
}

#[test]
fn roundtrip_canonical_strings() {
    for fen in [
        STARTPOS,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -",
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w Kq e6",
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3",
        "8/8/8/8/8/8/8/8 b - -",
    ] {
        assert_eq!(ChessBoard::from_fen(fen).map(|b| b.to_fen()), Ok(fen.to_string()));
    }
}

#[test]
fn clocks_are_ignored() {
    let b = ChessBoard::from_fen(&format!("{STARTPOS} 0 1")).expect("valid fen");
    assert_eq!(b.to_fen(), STARTPOS);
    let parsed = FenBoard::parse("8/8/8/8/8/8/8/8 w - - 12 40").expect("valid fen");
    assert_eq!(parsed.clocks, Some((12, 40)));
}

#[test]
fn en_passant_state_is_reconstructed() {
    let b = ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3")
        .expect("valid fen");
    assert_eq!(
        b.en_passant(),
        Some(EnPassant {
            target: Square::e3,
            creator: Square::e4
        })
    );
}

#[test]
fn malformed_strings() {
    for fen in [
        "",
        "not a fen",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq -",
        "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
        "rnbqkbnr/pppppppp/7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
        "rnbqkbnr/pppppppp/45/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq -",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w QK -",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq",
        // two white kings
        "4k3/8/8/8/8/8/8/3KK3 w - -",
        // pawn on the back rank
        "P3k3/8/8/8/8/8/8/4K3 w - -",
        // castling without the rook
        "4k3/8/8/8/8/8/8/4K3 w K -",
        // castling with the king displaced
        "4k3/8/8/8/8/8/8/R2K3R w Q -",
        // en-passant square on the wrong rank for the side to move
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3",
        // en-passant square without the pawn that made it
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq e3",
    ] {
        assert!(
            matches!(ChessBoard::from_fen(fen), Err(ChessError::MalformedFen(_))),
            "{fen:?} was accepted"
        );
    }
}

#[test]
fn parse_errors_name_the_field() {
    let fault = |fen: &str| match FenBoard::parse(fen) {
        Err(ChessError::MalformedFen(msg)) => msg,
        other => panic!("{fen:?} gave {other:?}"),
    };
    assert!(fault("8/8/8/8/8/8/8/7 w - -").contains("board"));
    assert!(fault("8/8/8/8/8/8/8/8 w  -").contains("castling"));
    assert!(fault("8/8/8/8/8/8/8/8 w - - 99999999999 1").contains("clocks"));
    assert!(fault("8/8/8/8/8/8/8/8 w - - 0 99999999999").contains("clocks"));
}

#[test]
fn castling_letters_grant_rights() {
    let parsed = FenBoard::parse("r3k2r/8/8/8/8/8/8/R3K2R w Kq -").expect("parses");
    let mut rights = CastleRights::NIL;
    rights.grant(ChessColor::WHITE, CastlingSide::KING);
    rights.grant(ChessColor::BLACK, CastlingSide::QUEEN);
    assert_eq!(parsed.rights, rights);
}
