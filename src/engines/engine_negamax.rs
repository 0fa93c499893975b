//! Book-then-search engine.
//!
//! Plays from the opening book while it has an answer for the position and
//! otherwise runs the configured fixed-depth search.

use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::engines::engine_trait::Engine;
use crate::game_state::game_state::GameState;
use crate::search::move_history::MoveHistory;
use crate::search::search_outcome::{search_position, SearchConfig, SearchOutcome, SearchResult};
use crate::tables::opening_book::OpeningBook;

pub struct NegamaxEngine {
    depth: u8,
    config: SearchConfig,
    book: Option<OpeningBook>,
    rng: StdRng,
}

impl NegamaxEngine {
    pub fn new(depth: u8, config: SearchConfig) -> Self {
        Self {
            depth,
            config,
            book: Some(OpeningBook::load_default()),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn without_book(mut self) -> Self {
        self.book = None;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }
}

impl Engine for NegamaxEngine {
    fn name(&self) -> &str {
        "Bramble Negamax"
    }

    fn choose_move(&mut self, game_state: &GameState, history: &MoveHistory) -> SearchResult<SearchOutcome> {
        if let Some(book) = &self.book {
            if let Some(book_move) = book.choose_weighted_move(game_state, &mut self.rng) {
                info!("book move from {}", book_move.line_name);
                return Ok(SearchOutcome::Chosen(book_move.generated.clone()));
            }
        }

        search_position(game_state, self.depth, &self.config, history)
    }
}
