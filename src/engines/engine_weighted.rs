//! One-ply engine driven by a trainable linear evaluator.
//!
//! Every successor is scored by a weighted sum over its derived flags (eight
//! per square) and a handful of auxiliary state inputs; the highest score
//! wins. Weights start random and are evolved by breeding two parents.

use log::debug;
use rand::Rng;

use crate::engines::engine_trait::Engine;
use crate::game_state::derived_flags::{derive_flags, DerivedFlags};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_legal_moves_with_flags;
use crate::search::move_history::MoveHistory;
use crate::search::search_outcome::{
    conclude_root, exclusion_of, terminal_without_moves, SearchOutcome, SearchResult,
};

pub const FLAGS_PER_SQUARE: usize = 8;
pub const AUXILIARY_INPUTS: usize = 8;
pub const INPUT_COUNT: usize = 64 * FLAGS_PER_SQUARE + AUXILIARY_INPUTS;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearEvaluator {
    weights: Vec<f64>,
}

impl LinearEvaluator {
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, String> {
        if weights.len() != INPUT_COUNT {
            return Err(format!("expected {INPUT_COUNT} weights, got {}", weights.len()));
        }
        Ok(Self { weights })
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            weights: (0..INPUT_COUNT).map(|_| rng.random_range(-1.0..1.0)).collect(),
        }
    }

    /// Each weight is inherited from one parent, chosen by coin flip.
    pub fn breed<R: Rng + ?Sized>(first: &LinearEvaluator, second: &LinearEvaluator, rng: &mut R) -> Self {
        Self {
            weights: first
                .weights
                .iter()
                .zip(&second.weights)
                .map(|(a, b)| if rng.random_bool(0.5) { *a } else { *b })
                .collect(),
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn score(&self, game_state: &GameState, flags: &DerivedFlags) -> f64 {
        inputs(game_state, flags)
            .iter()
            .zip(&self.weights)
            .map(|(input, weight)| input * weight)
            .sum()
    }
}

/// Flag inputs are square-major: `square * FLAGS_PER_SQUARE + flag`.
pub fn inputs(game_state: &GameState, flags: &DerivedFlags) -> Vec<f64> {
    let pinned = flags.pins.iter().fold(0u64, |acc, mask| acc | mask);
    let kings = game_state.pieces[0][PieceKind::King.index()] | game_state.pieces[1][PieceKind::King.index()];
    let masks = [
        flags.player,
        flags.opponent,
        flags.threatened,
        pinned,
        flags.does_not_block_check,
        flags.castle_available,
        flags.en_passant,
        kings,
    ];

    let mut out = Vec::with_capacity(INPUT_COUNT);
    for square in 0..64u8 {
        let bit = square_bit(square);
        out.extend(masks.iter().map(|mask| if mask & bit != 0 { 1.0 } else { 0.0 }));
    }

    let right = |flag: CastlingRights| if game_state.castling_rights & flag != 0 { 1.0 } else { 0.0 };
    out.extend([
        game_state.side_to_move.index() as f64,
        right(CASTLE_LIGHT_KINGSIDE),
        right(CASTLE_LIGHT_QUEENSIDE),
        right(CASTLE_DARK_KINGSIDE),
        right(CASTLE_DARK_QUEENSIDE),
        f64::from(game_state.halfmove_clock) / 100.0,
        f64::from(game_state.fullmove_number) / 100.0,
        if game_state.en_passant_square.is_some() { 1.0 } else { 0.0 },
    ]);
    out
}

pub struct WeightedEngine {
    evaluator: LinearEvaluator,
}

impl WeightedEngine {
    pub fn new(evaluator: LinearEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &LinearEvaluator {
        &self.evaluator
    }
}

impl Engine for WeightedEngine {
    fn name(&self) -> &str {
        "Bramble Weighted"
    }

    fn choose_move(&mut self, game_state: &GameState, history: &MoveHistory) -> SearchResult<SearchOutcome> {
        let flags = derive_flags(game_state);
        let children = generate_legal_moves_with_flags(game_state, &flags);
        if children.is_empty() {
            return Ok(SearchOutcome::Terminal(terminal_without_moves(&flags)));
        }

        let values: Vec<_> = children
            .iter()
            .map(|child| match exclusion_of(child, history) {
                Some(exclusion) => Err(exclusion),
                None => {
                    let child_flags = derive_flags(&child.game_after_move);
                    Ok(self.evaluator.score(&child.game_after_move, &child_flags))
                }
            })
            .collect();
        debug!("weighted engine scored {} successors", values.len());

        conclude_root(children, &values)
    }
}
