//! # Chess notation.
//!
//! Human-readable forms of squares, chessmen, moves and whole positions,
//! written with [`Display`] and read back with [`chumsky`] parsers
//! through the [`Parsable`] trait.

pub mod fen;
pub mod square;

use std::{fmt::Display, str::FromStr};

use chumsky::prelude::*;
use strum::VariantNames;

use crate::{
    error::ChessError,
    model::{
        BoardRank, ChessColor, ChessMan, ChessMove, ChessPiece, Square, mailbox::ChessBoard,
    },
};

/// Things with a canonical textual form that can be parsed.
pub trait Parsable: Sized {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self>;
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Square::VARIANTS[self.ix()])
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::parser()
            .then_ignore(end())
            .parse(s)
            .into_result()
            .map_err(|_| ChessError::InvalidSquare(s.to_string()))
    }
}

/// FEN letters, upper case for White. The alternate form uses the
/// figurine glyphs.
impl Display for ChessMan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arr = match (self.col(), f.alternate()) {
            (ChessColor::WHITE, true) => ["♙", "♘", "♗", "♖", "♕", "♔"],
            (ChessColor::BLACK, true) => ["♟", "♞", "♝", "♜", "♛", "♚"],
            (ChessColor::WHITE, false) => ["P", "N", "B", "R", "Q", "K"],
            (ChessColor::BLACK, false) => ["p", "n", "b", "r", "q", "k"],
        };
        f.write_str(arr[self.ech().ix()])
    }
}

impl Parsable for ChessMan {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        use ChessMan::*;
        choice((
            just('k').to(BLACK_KING),
            just('q').to(BLACK_QUEEN),
            just('r').to(BLACK_ROOK),
            just('b').to(BLACK_BISHOP),
            just('n').to(BLACK_KNIGHT),
            just('p').to(BLACK_PAWN),
            just('P').to(WHITE_PAWN),
            just('N').to(WHITE_KNIGHT),
            just('B').to(WHITE_BISHOP),
            just('R').to(WHITE_ROOK),
            just('Q').to(WHITE_QUEEN),
            just('K').to(WHITE_KING),
        ))
        .labelled("expected a chessman letter")
    }
}

impl Display for ChessPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arr = if f.alternate() {
            ["p", "n", "b", "r", "q", "k"]
        } else {
            ["P", "N", "B", "R", "Q", "K"]
        };
        f.write_str(arr[self.ix()])
    }
}

/// Either case is accepted.
impl Parsable for ChessPiece {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        use ChessPiece::*;
        choice((
            one_of("pP").to(PAWN),
            one_of("nN").to(KNIGHT),
            one_of("bB").to(BISHOP),
            one_of("rR").to(ROOK),
            one_of("qQ").to(QUEEN),
            one_of("kK").to(KING),
        ))
        .labelled("expected a piece letter")
    }
}

/// `white` or `black`; the alternate form is the FEN field `w` or `b`.
impl Display for ChessColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (*self, f.alternate()) {
            (Self::WHITE, true) => f.write_str("w"),
            (Self::BLACK, true) => f.write_str("b"),
            (Self::WHITE, false) => f.write_str("white"),
            (Self::BLACK, false) => f.write_str("black"),
        }
    }
}

impl Parsable for ChessColor {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        choice((
            just('w').to(ChessColor::WHITE),
            just('b').to(ChessColor::BLACK),
        ))
        .labelled("expected w or b")
    }
}

/// A diagram of the board from White's side, rank 8 on top.
///
/// ```text
/// 8 r n b q k b n r
/// 7 p p p p p p p p
/// 6 . . . . . . . .
/// ...
///   a b c d e f g h
/// ```
impl Display for ChessBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alt = f.alternate();
        for rank in (0..8u8).rev() {
            write!(f, "{}", BoardRank::VARIANTS[rank as usize])?;
            for file in 0..8u8 {
                match self.man(Square::from_u8(rank << 3 | file)) {
                    Some(man) if alt => write!(f, " {man:#}")?,
                    Some(man) => write!(f, " {man}")?,
                    None => f.write_str(" .")?,
                }
            }
            writeln!(f)?;
        }
        f.write_str("  a b c d e f g h")
    }
}

/// Pure coordinate notation, as spoken by UCI: `e2e4`, `e7e8q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoordNotation {
    pub from: Square,
    pub to: Square,
    pub prom: Option<ChessPiece>,
}

impl From<ChessMove> for CoordNotation {
    fn from(value: ChessMove) -> Self {
        Self {
            from: value.from,
            to: value.to,
            prom: value.promotion,
        }
    }
}

impl From<CoordNotation> for ChessMove {
    fn from(value: CoordNotation) -> Self {
        Self {
            from: value.from,
            to: value.to,
            promotion: value.prom,
        }
    }
}

impl Display for CoordNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.prom {
            write!(f, "{p:#}")?;
        }
        Ok(())
    }
}

impl Parsable for CoordNotation {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        group((
            Square::parser(),
            Square::parser(),
            ChessPiece::parser().or_not(),
        ))
        .map(|(from, to, prom)| Self { from, to, prom })
    }
}

impl FromStr for CoordNotation {
    type Err = ChessError;

    /// A well-formed pair of squares followed by garbage is reported as
    /// a bad promotion; anything else as a bad square.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(res) = Self::parser().then_ignore(end()).parse(s).into_result() {
            return Ok(res);
        }
        let squares = group((Square::parser(), Square::parser()));
        match squares.lazy().parse(s).into_result() {
            Ok(_) => Err(ChessError::InvalidPromotionKind(s.to_string())),
            Err(_) => Err(ChessError::InvalidSquare(s.to_string())),
        }
    }
}

impl FromStr for ChessMove {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoordNotation::from_str(s).map(ChessMove::from)
    }
}

impl Display for ChessMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        CoordNotation::from(*self).fmt(f)
    }
}

#[test]
fn square_from_str() {
    assert_eq!("e4".parse::<Square>(), Ok(Square::e4));
    assert_eq!(
        "z9".parse::<Square>(),
        Err(ChessError::InvalidSquare("z9".to_string()))
    );
}

#[test]
fn chessman_letters_roundtrip() {
    use strum::VariantArray;
    for man in ChessMan::VARIANTS {
        let s = man.to_string();
        assert_eq!(ChessMan::parser().then_ignore(end()).parse(&s).output(), Some(man));
    }
}

#[test]
fn coord_notation() {
    use Square::*;
    assert_eq!("e2e4".parse::<ChessMove>(), Ok(ChessMove::new(e2, e4)));
    assert_eq!(
        "e7e8q".parse::<ChessMove>(),
        Ok(ChessMove {
            from: e7,
            to: e8,
            promotion: Some(ChessPiece::QUEEN)
        })
    );
    assert_eq!(
        ChessMove {
            from: a2,
            to: a1,
            promotion: Some(ChessPiece::KNIGHT)
        }
        .to_string(),
        "a2a1n"
    );
    assert!(matches!(
        "e7e8x".parse::<ChessMove>(),
        Err(ChessError::InvalidPromotionKind(_))
    ));
    assert!(matches!(
        "e9e8".parse::<ChessMove>(),
        Err(ChessError::InvalidSquare(_))
    ));
}

#[test]
fn board_diagram() {
    let s = ChessBoard::startpos().to_string();
    let mut lines = s.lines();
    assert_eq!(lines.next(), Some("8 r n b q k b n r"));
    assert_eq!(lines.next(), Some("7 p p p p p p p p"));
    assert_eq!(lines.nth(4), Some("2 P P P P P P P P"));
    assert_eq!(lines.last(), Some("  a b c d e f g h"));
}
