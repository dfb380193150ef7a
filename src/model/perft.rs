//! # Performance test
//!
//! Counts the leaves of the legal move tree to a fixed depth. The
//! counts for well-known positions are published, which makes this the
//! standard correctness check for a move generator.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use crate::{
    model::{LegalMove, mailbox::ChessBoard, movegen::LegalBlessing, movegen::enumerate},
    notation::CoordNotation,
};

/// Count the leaves below `board`, broken down by first move.
pub fn perft(board: &ChessBoard, depth: usize) -> PerfTestRes {
    let mut breakdown = BTreeMap::new();
    let now = Instant::now();

    if depth != 0 {
        let mut firstmoves = vec![];
        enumerate::<LegalBlessing>(board, board.active(), &mut firstmoves);

        for mv in firstmoves {
            let n = if depth == 1 {
                1
            } else {
                let mut next = board.clone();
                next.make_move(mv);
                perft_recurse(&next, depth - 1)
            };
            breakdown.insert(CoordNotation::from(mv.0), n);
        }
    }

    PerfTestRes {
        elapsed_duration: now.elapsed(),
        breakdown,
        depth,
    }
}

fn perft_recurse(board: &ChessBoard, depth: usize) -> usize {
    let mut moves: Vec<LegalMove> = Vec::with_capacity(48);
    enumerate::<LegalBlessing>(board, board.active(), &mut moves);

    if depth == 1 {
        return moves.len();
    }

    let mut res = 0;
    for mv in moves {
        let mut next = board.clone();
        next.make_move(mv);
        res += perft_recurse(&next, depth - 1);
    }
    res
}

#[derive(Debug, Clone)]
pub struct PerfTestRes {
    pub depth: usize,
    pub elapsed_duration: Duration,
    pub breakdown: BTreeMap<CoordNotation, usize>,
}

impl PerfTestRes {
    /// Leaves counted in total.
    pub fn nodes(&self) -> usize {
        if self.depth == 0 {
            1
        } else {
            self.breakdown.values().sum()
        }
    }

    pub fn pretty_print(&self) {
        println!("Performance test depth {}", self.depth);
        for (mv, n) in &self.breakdown {
            println!("{}: {}", mv, n);
        }
        println!(
            "Time elapsed: {:.02}ms",
            self.elapsed_duration.as_secs_f64() * 1000.0
        );
        println!(
            "Nodes per second: {:.02}",
            self.nodes() as f64 / self.elapsed_duration.as_secs_f64()
        );
        println!("Nodes searched: {}", self.nodes())
    }
}

#[test]
fn startpos_shallow() {
    let b = ChessBoard::startpos();
    assert_eq!(perft(&b, 0).nodes(), 1);
    assert_eq!(perft(&b, 1).nodes(), 20);
    let res = perft(&b, 2);
    assert_eq!(res.nodes(), 400);
    assert_eq!(res.breakdown.len(), 20);
    assert!(res.breakdown.values().all(|n| *n == 20));
}
