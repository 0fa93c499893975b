//! Search entry points, results, and errors.
//!
//! `best_move` is the fixed-depth evaluator: it either picks a successor of
//! the position or classifies why there is nothing to pick. The strategy used
//! to get there is chosen through [`SearchConfig`]; every strategy returns
//! the same successor for the same inputs.

use std::error::Error;
use std::fmt;

use log::{debug, info};

use crate::game_state::chess_rules::FIFTY_MOVE_HALFMOVE_LIMIT;
use crate::game_state::derived_flags::DerivedFlags;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::GeneratedMove;
use crate::search::board_scoring::SideWeightings;
use crate::search::breadth_first::search_breadth_first;
use crate::search::concurrent::search_concurrent;
use crate::search::depth_first::search_depth_first;
use crate::search::move_history::MoveHistory;
use crate::search::threading::ThreadingConfig;
use crate::utils::long_algebraic::describe_move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Depth must be at least one ply.
    InvalidDepth,
    WorkerPanicked(String),
    InvalidState(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidDepth => write!(f, "search depth must be a positive ply count"),
            SearchError::WorkerPanicked(detail) => write!(f, "search worker failed: {detail}"),
            SearchError::InvalidState(detail) => write!(f, "invalid search state: {detail}"),
        }
    }
}

impl Error for SearchError {}

pub type SearchResult<T> = Result<T, SearchError>;

/// Why a position has no successor to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Checkmate,
    Stalemate,
    /// Every legal successor would run the half-move clock past the limit.
    FiftyMoveExhausted,
    /// Every legal successor would repeat the last four moves of the history.
    RepetitionExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Chosen(GeneratedMove),
    Terminal(Terminal),
}

impl SearchOutcome {
    pub fn chosen(&self) -> Option<&GeneratedMove> {
        match self {
            SearchOutcome::Chosen(generated) => Some(generated),
            SearchOutcome::Terminal(_) => None,
        }
    }

    pub fn terminal(&self) -> Option<Terminal> {
        match self {
            SearchOutcome::Chosen(_) => None,
            SearchOutcome::Terminal(terminal) => Some(*terminal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    #[default]
    Sequential,
    Concurrent,
    BreadthFirst,
}

impl SearchStrategy {
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name.to_ascii_lowercase().as_str() {
            "sequential" | "depth-first" => Ok(SearchStrategy::Sequential),
            "concurrent" | "parallel" => Ok(SearchStrategy::Concurrent),
            "breadth-first" | "bfs" => Ok(SearchStrategy::BreadthFirst),
            _ => Err(format!("Unknown search strategy: {name}")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    pub threading: ThreadingConfig,
    pub weightings: SideWeightings,
}

/// Reason a legal successor is never selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exclusion {
    FiftyMove,
    Repetition,
}

pub(crate) fn exclusion_of(child: &GeneratedMove, history: &MoveHistory) -> Option<Exclusion> {
    if child.game_after_move.halfmove_clock > FIFTY_MOVE_HALFMOVE_LIMIT {
        Some(Exclusion::FiftyMove)
    } else if history.would_oscillate(child.chess_move) {
        Some(Exclusion::Repetition)
    } else {
        None
    }
}

/// Classifies a position whose side to move has no legal successor.
pub(crate) fn terminal_without_moves(flags: &DerivedFlags) -> Terminal {
    if flags.is_in_check() {
        Terminal::Checkmate
    } else {
        Terminal::Stalemate
    }
}

/// Picks the highest-valued root child, the first one winning ties.
///
/// `values[i]` is `Err(exclusion)` for children that may not be selected.
pub(crate) fn conclude_root(
    mut children: Vec<GeneratedMove>,
    values: &[Result<f64, Exclusion>],
) -> SearchResult<SearchOutcome> {
    if children.len() != values.len() {
        return Err(SearchError::InvalidState(format!(
            "{} root children scored with {} values",
            children.len(),
            values.len()
        )));
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, value) in values.iter().enumerate() {
        if let Ok(value) = *value {
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((index, value));
            }
        }
    }

    match best {
        Some((index, value)) => {
            debug!("root child {index} selected with value {value}");
            Ok(SearchOutcome::Chosen(children.swap_remove(index)))
        }
        None if values.contains(&Err(Exclusion::FiftyMove)) => {
            Ok(SearchOutcome::Terminal(Terminal::FiftyMoveExhausted))
        }
        None => Ok(SearchOutcome::Terminal(Terminal::RepetitionExhausted)),
    }
}

/// Fixed-depth search with the default configuration and no prior moves.
pub fn best_move(game_state: &GameState, depth: u8) -> SearchResult<SearchOutcome> {
    search_position(game_state, depth, &SearchConfig::default(), &MoveHistory::new())
}

pub fn search_position(
    game_state: &GameState,
    depth: u8,
    config: &SearchConfig,
    history: &MoveHistory,
) -> SearchResult<SearchOutcome> {
    if depth == 0 {
        return Err(SearchError::InvalidDepth);
    }

    debug!(
        "searching {} at depth {depth} with {:?}",
        game_state.get_fen(),
        config.strategy
    );

    let outcome = match config.strategy {
        SearchStrategy::Sequential => search_depth_first(game_state, depth, &config.weightings, history)?,
        SearchStrategy::Concurrent => search_concurrent(game_state, depth, config, history)?,
        SearchStrategy::BreadthFirst => search_breadth_first(game_state, depth, &config.weightings, history)?,
    };

    match &outcome {
        SearchOutcome::Chosen(generated) => {
            let notation = describe_move(game_state, generated.chess_move)
                .map_err(SearchError::InvalidState)?;
            info!("chose {notation} -> {}", generated.game_after_move.get_fen());
        }
        SearchOutcome::Terminal(terminal) => info!("no move to play: {terminal:?}"),
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::ChessMove;
    use crate::move_generation::legal_move_generator::generate_legal_moves;

    fn outcome(fen: &str, depth: u8) -> SearchOutcome {
        let game = GameState::from_fen(fen).expect("test FEN should parse");
        best_move(&game, depth).expect("search should succeed")
    }

    fn chosen_fen(fen: &str, depth: u8) -> String {
        outcome(fen, depth)
            .chosen()
            .expect("a move should be chosen")
            .game_after_move
            .get_fen()
    }

    #[test]
    fn zero_depth_is_rejected() {
        let game = GameState::new_game();
        assert_eq!(best_move(&game, 0), Err(SearchError::InvalidDepth));
    }

    #[test]
    fn pawn_takes_hanging_queen() {
        assert_eq!(
            chosen_fen("7k/8/8/q7/1P6/8/8/7K w - - 0 1", 4),
            "7k/8/8/P7/8/8/8/7K b - - 0 1"
        );
    }

    #[test]
    fn finds_mate_in_one() {
        assert_eq!(
            chosen_fen("k5B1/7R/8/8/8/8/P1PPPPPP/1R2K3 w - - 0 1", 4),
            "k7/7R/8/3B4/8/8/P1PPPPPP/1R2K3 b - - 1 1"
        );
    }

    #[test]
    fn pawn_takes_queen_in_front_of_it() {
        assert_eq!(
            chosen_fen("4k3/8/8/3q1p2/4P3/8/8/4K3 w - - 0 1", 3),
            "4k3/8/8/3P1p2/8/8/8/4K3 b - - 0 1"
        );
    }

    #[test]
    fn exhausted_clock_leaves_nothing_to_play() {
        assert_eq!(
            outcome("7K/7P/8/8/8/8/8/k7 w - - 99 50", 4).terminal(),
            Some(Terminal::FiftyMoveExhausted)
        );
    }

    #[test]
    fn clock_excluded_successors_lose_to_a_reset() {
        // Every rook move runs the clock out; only the capture resets it.
        assert_eq!(
            chosen_fen("6k1/8/8/8/8/8/1r6/K6R w - - 99 80", 2),
            "6k1/8/8/8/8/8/1K6/7R b - - 0 80"
        );
    }

    #[test]
    fn checkmate_and_stalemate_are_classified() {
        assert_eq!(
            outcome("k7/7R/8/3B4/8/8/P1PPPPPP/1R2K3 b - - 1 1", 2).terminal(),
            Some(Terminal::Checkmate)
        );
        assert_eq!(
            outcome("k7/2Q5/8/8/8/8/8/7K b - - 0 1", 2).terminal(),
            Some(Terminal::Stalemate)
        );
    }

    #[test]
    fn stalemating_moves_are_avoided() {
        // Qc7 and every king move leave the black king without a move.
        let chosen = outcome("k7/8/1Q6/8/8/8/8/7K w - - 0 1", 2);
        let generated = chosen.chosen().expect("a move should be chosen");
        assert!(!generate_legal_moves(&generated.game_after_move).is_empty());
    }

    fn history_repeating(chess_move: ChessMove) -> MoveHistory {
        let mut history = MoveHistory::new();
        let cycle = [ChessMove::new(1, 2), ChessMove::new(3, 4), ChessMove::new(5, 6)];
        for recorded in cycle.iter().chain([chess_move].iter()).chain(cycle.iter()) {
            history.push(*recorded);
        }
        history
    }

    #[test]
    fn oscillating_successor_is_never_chosen() {
        let game = GameState::from_fen("7k/8/8/q7/1P6/8/8/7K w - - 0 1").expect("test FEN should parse");
        let capture = ChessMove::new(25, 32);
        let history = history_repeating(capture);
        let outcome = search_position(&game, 1, &SearchConfig::default(), &history).expect("search should succeed");
        let generated = outcome.chosen().expect("other moves remain");
        assert_ne!(generated.chess_move, capture);
    }

    #[test]
    fn only_oscillating_successor_exhausts_by_repetition() {
        let game = GameState::from_fen("7k/8/8/8/8/8/1r6/K7 w - - 0 80").expect("test FEN should parse");
        let history = history_repeating(ChessMove::new(0, 9));
        let outcome = search_position(&game, 2, &SearchConfig::default(), &history).expect("search should succeed");
        assert_eq!(outcome.terminal(), Some(Terminal::RepetitionExhausted));
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!(SearchStrategy::from_name("bfs"), Ok(SearchStrategy::BreadthFirst));
        assert_eq!(SearchStrategy::from_name("Concurrent"), Ok(SearchStrategy::Concurrent));
        assert!(SearchStrategy::from_name("random").is_err());
    }
}
