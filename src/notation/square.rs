use chumsky::{Parser, prelude::*};

use crate::{model::*, notation::Parsable};

impl Parsable for BoardFile {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        one_of("abcdefgh")
            .map(|c: char| Self::from_u8((c as u32 - 'a' as u32) as u8))
            .labelled("expected a file letter a ... h")
    }
}

impl Parsable for BoardRank {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        one_of("12345678")
            .map(|c: char| Self::from_u8((c as u32 - '1' as u32) as u8))
            .labelled("expected a rank number 1 ... 8")
    }
}

impl Parsable for Square {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        group((BoardFile::parser(), BoardRank::parser()))
            .map(|(f, r)| Self::from_coords(f, r))
            .labelled("expected a valid chess board square a1 ... h8")
    }
}

#[test]
fn test_square_parser() {
    use strum::IntoEnumIterator;
    for sq in Square::iter() {
        let sqs = sq.to_string();
        assert_eq!(
            Square::parser()
                .then_ignore(end())
                .parse(&sqs)
                .output()
                .expect(&format!("Unable to parse {}", sq)),
            &sq
        );
    }
}

#[test]
fn test_square_parser_rejects() {
    for bad in ["i1", "a9", "a0", "A1", "1a", "a", ""] {
        assert!(Square::parser().then_ignore(end()).parse(bad).has_errors(), "{bad}");
    }
}
