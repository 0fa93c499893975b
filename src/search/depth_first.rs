//! Sequential fixed-depth negamax.
//!
//! Each node values its children from its own mover's perspective and hands
//! the best one up to its parent, which subtracts it (discounted) from the
//! child's material swing. Only material travels through the recursion; the
//! positional tie-break is added by the root when it ranks its children. The
//! move history is extended on the way down and restored on the way up.

use log::trace;

use crate::game_state::derived_flags::{derive_flags, DerivedFlags};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::{generate_legal_moves_with_flags, GeneratedMove};
use crate::search::board_scoring::{material_swing, tie_break, SideWeightings, DEPTH_DISCOUNT, MATE};
use crate::search::move_history::MoveHistory;
use crate::search::search_outcome::{
    conclude_root, exclusion_of, terminal_without_moves, SearchOutcome, SearchResult,
};

pub fn search_depth_first(
    game_state: &GameState,
    depth: u8,
    weightings: &SideWeightings,
    history: &MoveHistory,
) -> SearchResult<SearchOutcome> {
    let flags = derive_flags(game_state);
    let children = generate_legal_moves_with_flags(game_state, &flags);
    if children.is_empty() {
        return Ok(SearchOutcome::Terminal(terminal_without_moves(&flags)));
    }

    let mut line = history.clone();
    let values: Vec<_> = children
        .iter()
        .map(|child| match exclusion_of(child, &line) {
            Some(exclusion) => Err(exclusion),
            None => Ok(child_value(game_state, child, depth, weightings, &mut line)),
        })
        .collect();

    conclude_root(children, &values)
}

/// Value of playing `child` from `parent` with `depth` plies of lookahead,
/// counting the child itself as the first ply. This is the ranking value:
/// the child's own tie-break plus its material line value.
pub(crate) fn child_value(
    parent: &GameState,
    child: &GeneratedMove,
    depth: u8,
    weightings: &SideWeightings,
    line: &mut MoveHistory,
) -> f64 {
    let child_flags = derive_flags(&child.game_after_move);
    let weights = weightings.for_color(parent.side_to_move);
    tie_break(&child_flags, weights) + line_value(parent, child, &child_flags, depth, line)
}

/// Material swing of `child` less the discounted material the opponent can
/// force from it.
fn line_value(
    parent: &GameState,
    child: &GeneratedMove,
    child_flags: &DerivedFlags,
    depth: u8,
    line: &mut MoveHistory,
) -> f64 {
    let mut value = material_swing(parent, &child.game_after_move);

    if depth > 1 {
        line.push(child.chess_move);
        value -= DEPTH_DISCOUNT * onward_value(&child.game_after_move, child_flags, depth - 1, line);
        line.pop();
    }

    value
}

/// Best material line value the side to move in `game_state` can force.
///
/// Mated positions return `-MATE`; positions with nothing selectable
/// otherwise (stalemate, or every child excluded) return `MATE` so the
/// parent avoids them whenever it has an alternative.
pub(crate) fn onward_value(game_state: &GameState, flags: &DerivedFlags, depth: u8, line: &mut MoveHistory) -> f64 {
    let children = generate_legal_moves_with_flags(game_state, flags);
    if children.is_empty() {
        trace!("no moves at depth {depth} (in check: {})", flags.is_in_check());
        return if flags.is_in_check() { -MATE } else { MATE };
    }

    let mut best: Option<f64> = None;
    for child in &children {
        if exclusion_of(child, line).is_some() {
            continue;
        }
        let child_flags = derive_flags(&child.game_after_move);
        let value = line_value(game_state, child, &child_flags, depth, line);
        if best.map_or(true, |best_value| value > best_value) {
            best = Some(value);
        }
    }

    best.unwrap_or(MATE)
}
