//! Root-split negamax over a bounded pool of scoped worker threads.
//!
//! Workers pull root-child indices from a shared counter and score each
//! child with the sequential search. Every worker is joined before any
//! result is used, and the first failed worker is reported to the caller.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, trace};

use crate::game_state::derived_flags::derive_flags;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::generate_legal_moves_with_flags;
use crate::search::depth_first::{child_value, search_depth_first};
use crate::search::move_history::MoveHistory;
use crate::search::search_outcome::{
    conclude_root, exclusion_of, terminal_without_moves, SearchConfig, SearchOutcome, SearchResult,
};
use crate::search::threading::run_scoped_workers;

pub fn search_concurrent(
    game_state: &GameState,
    depth: u8,
    config: &SearchConfig,
    history: &MoveHistory,
) -> SearchResult<SearchOutcome> {
    if !config.threading.fans_out_at(depth) {
        return search_depth_first(game_state, depth, &config.weightings, history);
    }

    let flags = derive_flags(game_state);
    let children = generate_legal_moves_with_flags(game_state, &flags);
    if children.is_empty() {
        return Ok(SearchOutcome::Terminal(terminal_without_moves(&flags)));
    }

    let mut values: Vec<_> = children
        .iter()
        .map(|child| match exclusion_of(child, history) {
            Some(exclusion) => Err(exclusion),
            None => Ok(0.0),
        })
        .collect();
    let pending: Vec<usize> = (0..children.len()).filter(|&i| values[i].is_ok()).collect();
    if pending.is_empty() {
        return conclude_root(children, &values);
    }

    let workers = config.threading.normalized_threads().min(pending.len());
    debug!("scoring {} root children on {workers} workers", pending.len());

    let next = AtomicUsize::new(0);
    let joined = run_scoped_workers(workers, |worker_id| {
        let mut line = history.clone();
        let mut scored = Vec::new();
        loop {
            let slot = next.fetch_add(1, Ordering::Relaxed);
            let Some(&index) = pending.get(slot) else {
                break;
            };
            trace!("worker {worker_id} scoring root child {index}");
            let value = child_value(game_state, &children[index], depth, &config.weightings, &mut line);
            scored.push((index, value));
        }
        scored
    })?;

    for (index, value) in joined.into_iter().flatten() {
        values[index] = Ok(value);
    }

    conclude_root(children, &values)
}
