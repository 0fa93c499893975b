//! Crate root module declarations for the Bramble Chess search core.
//!
//! Exposes the position store (bitboards plus derived flags), per-piece move
//! generation, the state transition, the negamax search strategies, and the
//! codecs/tables/engines layered on top of them.

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod derived_flags;
    pub mod game_state;
}

pub mod moves {
    pub mod directional_limits;
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod breadth_first;
    pub mod concurrent;
    pub mod depth_first;
    pub mod move_history;
    pub mod search_outcome;
    pub mod threading;

    pub use search_outcome::{best_move, search_position};
}

pub mod tables {
    pub mod opening_book;
}

pub mod engines {
    pub mod engine_negamax;
    pub mod engine_trait;
    pub mod engine_weighted;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
}
