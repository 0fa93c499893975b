//! Layer-by-layer memoized negamax.
//!
//! Positions are identified by the packed move path from the root and
//! rebuilt on demand, so only material swings are kept between layers.
//! Interior layers record every selectable child; the deepest layer records
//! only the best child of each parent. Values are then folded bottom-up with
//! the same sign flip and discount as the depth-first search, and the root
//! adds each child's tie-break once, which makes the chosen successor
//! identical.

use std::cmp::Reverse;
use std::collections::HashMap;

use log::debug;

use crate::game_state::derived_flags::derive_flags;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::generate_legal_moves_with_flags;
use crate::moves::move_descriptions::{pack_move, unpack_move};
use crate::search::board_scoring::{material_swing, tie_break, SideWeightings, DEPTH_DISCOUNT, MATE};
use crate::search::move_history::MoveHistory;
use crate::search::search_outcome::{
    conclude_root, exclusion_of, terminal_without_moves, Exclusion, SearchError, SearchOutcome, SearchResult,
};

pub type MovePath = Vec<u16>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoEntry {
    /// Material swing for the side that moved into this node.
    pub score: f64,
    /// Onward value when the node has nothing selectable to play.
    pub forced: Option<f64>,
}

fn replay(root: &GameState, path: &[u16]) -> GameState {
    path.iter()
        .fold(root.clone(), |game, packed| apply_move(&game, unpack_move(*packed)))
}

fn line_for(history: &MoveHistory, path: &[u16]) -> MoveHistory {
    let mut line = history.clone();
    for packed in path {
        line.push(unpack_move(*packed));
    }
    line
}

pub fn search_breadth_first(
    game_state: &GameState,
    depth: u8,
    weightings: &SideWeightings,
    history: &MoveHistory,
) -> SearchResult<SearchOutcome> {
    let root_flags = derive_flags(game_state);
    let root_children = generate_legal_moves_with_flags(game_state, &root_flags);
    if root_children.is_empty() {
        return Ok(SearchOutcome::Terminal(terminal_without_moves(&root_flags)));
    }

    let mut memo: HashMap<MovePath, MemoEntry> = HashMap::new();
    let mut frontier: Vec<MovePath> = Vec::new();
    let mut root_tie_breaks: HashMap<u16, f64> = HashMap::new();
    let root_weights = weightings.for_color(game_state.side_to_move);

    for child in &root_children {
        if exclusion_of(child, history).is_some() {
            continue;
        }
        let packed = pack_move(child.chess_move);
        root_tie_breaks.insert(packed, tie_break(&derive_flags(&child.game_after_move), root_weights));
        let score = material_swing(game_state, &child.game_after_move);
        memo.insert(vec![packed], MemoEntry { score, forced: None });
        frontier.push(vec![packed]);
    }

    for layer in 2..=depth {
        let last_layer = layer == depth;
        let mut next_frontier = Vec::new();

        for parent_path in &frontier {
            let parent = replay(game_state, parent_path);
            let parent_flags = derive_flags(&parent);
            let children = generate_legal_moves_with_flags(&parent, &parent_flags);
            let line = line_for(history, parent_path);

            let mut best_leaf: Option<(MovePath, f64)> = None;
            let mut selectable = 0usize;
            for child in &children {
                if exclusion_of(child, &line).is_some() {
                    continue;
                }
                selectable += 1;
                let score = material_swing(&parent, &child.game_after_move);
                let mut path = parent_path.clone();
                path.push(pack_move(child.chess_move));

                if last_layer {
                    if best_leaf.as_ref().map_or(true, |(_, best)| score > *best) {
                        best_leaf = Some((path, score));
                    }
                } else {
                    memo.insert(path.clone(), MemoEntry { score, forced: None });
                    next_frontier.push(path);
                }
            }

            if let Some((path, score)) = best_leaf {
                memo.insert(path, MemoEntry { score, forced: None });
            }

            if selectable == 0 {
                let forced = if children.is_empty() && parent_flags.is_in_check() { -MATE } else { MATE };
                let entry = memo.get_mut(parent_path).ok_or_else(|| {
                    SearchError::InvalidState(format!("frontier path {parent_path:?} missing from memo"))
                })?;
                entry.forced = Some(forced);
            }
        }

        debug!("layer {layer}: {} paths expanded, {} memo entries", frontier.len(), memo.len());
        frontier = next_frontier;
    }

    let cumulative = fold_cumulative(&memo, depth);

    let mut values: Vec<Result<f64, Exclusion>> = Vec::with_capacity(root_children.len());
    for child in &root_children {
        let value = match exclusion_of(child, history) {
            Some(exclusion) => Err(exclusion),
            None => {
                let packed = pack_move(child.chess_move);
                let (Some(own), Some(onward)) = (root_tie_breaks.get(&packed), cumulative.get(&vec![packed])) else {
                    return Err(SearchError::InvalidState(format!("root move {packed} was never scored")));
                };
                Ok(own + onward)
            }
        };
        values.push(value);
    }

    conclude_root(root_children, &values)
}

/// Folds material swings into full negamax line values, deepest paths first.
fn fold_cumulative(memo: &HashMap<MovePath, MemoEntry>, depth: u8) -> HashMap<MovePath, f64> {
    let mut paths: Vec<&MovePath> = memo.keys().collect();
    paths.sort_by_key(|path| Reverse(path.len()));

    let mut cumulative: HashMap<MovePath, f64> = HashMap::with_capacity(memo.len());
    let mut best_child: HashMap<&[u16], f64> = HashMap::new();

    for path in paths {
        let entry = memo[path];
        let value = if path.len() == usize::from(depth) {
            entry.score
        } else {
            let onward = entry
                .forced
                .or_else(|| best_child.get(path.as_slice()).copied())
                .unwrap_or(MATE);
            entry.score - DEPTH_DISCOUNT * onward
        };

        let parent = &path[..path.len() - 1];
        if !parent.is_empty() {
            let best = best_child.entry(parent).or_insert(value);
            if value > *best {
                *best = value;
            }
        }
        cumulative.insert(path.clone(), value);
    }

    cumulative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::ChessMove;
    use crate::search::depth_first::search_depth_first;
    use crate::search::search_outcome::Terminal;

    fn both(fen: &str, depth: u8) -> (SearchOutcome, SearchOutcome) {
        let game = GameState::from_fen(fen).expect("test FEN should parse");
        let weightings = SideWeightings::default();
        let history = MoveHistory::new();
        (
            search_breadth_first(&game, depth, &weightings, &history).expect("search should succeed"),
            search_depth_first(&game, depth, &weightings, &history).expect("search should succeed"),
        )
    }

    #[test]
    fn matches_depth_first_choice() {
        let cases = [
            ("7k/8/8/q7/1P6/8/8/7K w - - 0 1", 4),
            ("4k3/8/8/3q1p2/4P3/8/8/4K3 w - - 0 1", 3),
            ("4k3/8/4p3/3p4/8/8/3Q4/4K3 w - - 0 1", 2),
            ("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3", 3),
            ("k7/8/1Q6/8/8/8/8/7K w - - 0 1", 3),
        ];
        for (fen, depth) in cases {
            let (breadth_first, depth_first) = both(fen, depth);
            assert_eq!(breadth_first, depth_first, "{fen} at depth {depth}");
        }
    }

    #[test]
    fn quiet_lines_score_only_the_root_tie_break() {
        let game = GameState::new_game();
        let weightings = SideWeightings::default();
        let history = MoveHistory::new();
        let shallow = search_breadth_first(&game, 1, &weightings, &history).expect("search should succeed");
        let deeper = search_breadth_first(&game, 3, &weightings, &history).expect("search should succeed");
        assert_eq!(shallow, deeper);
    }

    #[test]
    fn finds_mate_in_one() {
        let (outcome, _) = both("k5B1/7R/8/8/8/8/P1PPPPPP/1R2K3 w - - 0 1", 4);
        assert_eq!(
            outcome.chosen().map(|g| g.game_after_move.get_fen()),
            Some("k7/7R/8/3B4/8/8/P1PPPPPP/1R2K3 b - - 1 1".to_owned())
        );
    }

    #[test]
    fn terminal_roots_are_classified() {
        let (mated, _) = both("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1", 2);
        assert_eq!(mated.terminal(), Some(Terminal::Checkmate));
        let (exhausted, _) = both("7K/7P/8/8/8/8/8/k7 w - - 99 50", 4);
        assert_eq!(exhausted.terminal(), Some(Terminal::FiftyMoveExhausted));
    }

    #[test]
    fn fold_subtracts_discounted_onward_values() {
        let mut memo = HashMap::new();
        memo.insert(vec![1], MemoEntry { score: 0.5, forced: None });
        memo.insert(vec![1, 2], MemoEntry { score: 2.0, forced: None });
        memo.insert(vec![1, 4], MemoEntry { score: -1.0, forced: None });
        memo.insert(vec![3], MemoEntry { score: 1.0, forced: Some(MATE) });
        let cumulative = fold_cumulative(&memo, 2);
        assert_eq!(cumulative[&vec![1u16, 2]], 2.0);
        assert_eq!(cumulative[&vec![1u16]], 0.5 - DEPTH_DISCOUNT * 2.0);
        assert!(cumulative[&vec![3u16]] < -1e30);
    }

    #[test]
    fn replaying_a_path_rebuilds_the_position() {
        let game = GameState::new_game();
        let path = [pack_move(ChessMove::new(12, 28)), pack_move(ChessMove::new(52, 36))];
        assert_eq!(
            replay(&game, &path).get_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
        assert_eq!(replay(&game, &[]), game);
    }
}
