//! Engine abstraction used by the game driver.
//!
//! Different move-selection strategies sit behind one trait and all answer
//! with the same [`SearchOutcome`] the search layer produces.

use crate::game_state::game_state::GameState;
use crate::search::move_history::MoveHistory;
use crate::search::search_outcome::{SearchOutcome, SearchResult};

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    /// Picks the next move for the side to move in `game_state`, given the
    /// moves already played to reach it.
    fn choose_move(&mut self, game_state: &GameState, history: &MoveHistory) -> SearchResult<SearchOutcome>;
}
