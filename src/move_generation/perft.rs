//! Perft node counting over the legal generator.
//!
//! Used to validate generation against published node counts and as a
//! benchmark workload.

use log::debug;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, GeneratedMove};
use crate::search::search_outcome::SearchResult;
use crate::search::threading::run_scoped_workers;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub promotions: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.promotions += rhs.promotions;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft(game_state: &GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generate_legal_moves(game_state) {
        perft_recurse(game_state, &mv, depth, 1, &mut total);
    }
    total
}

/// One scoped thread per root move; a panicked worker surfaces as an error.
pub fn perft_multi_threaded(game_state: &GameState, depth: u8) -> SearchResult<PerftCounts> {
    if depth == 0 {
        return Ok(perft(game_state, depth));
    }

    let root_moves = generate_legal_moves(game_state);
    debug!("perft depth {depth}: {} root moves", root_moves.len());

    let locals = run_scoped_workers(root_moves.len(), |index| {
        let mut local = PerftCounts::default();
        perft_recurse(game_state, &root_moves[index], depth, 1, &mut local);
        local
    })?;

    let mut total = PerftCounts::default();
    for local in locals {
        total.merge(local);
    }
    Ok(total)
}

fn perft_recurse(
    parent: &GameState,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) {
    if current_depth == search_depth {
        counts.nodes += 1;
        if parent.occupancy_all.count_ones() > mv.game_after_move.occupancy_all.count_ones() {
            counts.captures += 1;
        }
        if mv.chess_move.promotion.is_some() {
            counts.promotions += 1;
        }
        if generate_legal_moves(&mv.game_after_move).is_empty()
            && is_king_in_check(&mv.game_after_move, mv.game_after_move.side_to_move)
        {
            counts.checkmates += 1;
        }
        return;
    }

    for child in generate_legal_moves(&mv.game_after_move) {
        perft_recurse(&mv.game_after_move, &child, search_depth, current_depth + 1, counts);
    }
}
