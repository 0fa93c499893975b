//! Position scoring used by every search strategy.
//!
//! A child is valued from the perspective of the side that moved into it.
//! Lookahead only ever carries material; the small positional tie-break read
//! off the child's derived flags is added once, by the node ranking its own
//! children. Tie-break weights live in an explicit [`WeightingConfig`] per
//! side rather than shared tables.

use log::info;
use rand::Rng;

use crate::game_state::derived_flags::DerivedFlags;
use crate::game_state::{chess_types::*, game_state::GameState};

/// Sentinel magnitude for mate and for positions with nothing to play.
pub const MATE: f64 = f32::MAX as f64;

/// Applied to onward values once per ply of lookahead.
pub const DEPTH_DISCOUNT: f64 = 0.99;

/// d4, e4, d5, e5.
pub const CENTRE_MASK: u64 = (1 << 27) | (1 << 28) | (1 << 35) | (1 << 36);

const THREATENED_SQUARE_MAX: f64 = 64.0;
const THREATENED_PIECE_MAX: f64 = 16.0;
const OCCUPIED_CENTRE_MAX: f64 = 4.0;

#[inline]
pub const fn piece_value(piece: PieceKind) -> i32 {
    match piece {
        PieceKind::Pawn => 1,
        PieceKind::Knight => 3,
        PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 0,
    }
}

/// Material of `color` minus material of its opponent.
pub fn material_balance(game_state: &GameState, color: Color) -> i32 {
    let own = &game_state.pieces[color.index()];
    let other = &game_state.pieces[color.opposite().index()];
    ALL_PIECE_KINDS
        .iter()
        .map(|piece| {
            let i = piece.index();
            (own[i].count_ones() as i32 - other[i].count_ones() as i32) * piece_value(*piece)
        })
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightingConfig {
    pub threatened_square: f64,
    pub threatened_piece: f64,
    pub occupied_centre: f64,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            threatened_square: 0.00625,
            threatened_piece: 0.00625,
            occupied_centre: 0.05,
        }
    }
}

impl WeightingConfig {
    /// Splits a unit budget into three random shares, rotated across the
    /// three terms and scaled down by each term's largest possible count.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let first = rng.random_range(0.0..1.0);
        let second = rng.random_range(0.0..(1.0 - first));
        let shares = [first, second, 1.0 - first - second];
        let offset = rng.random_range(0..3);

        Self {
            threatened_square: shares[offset] / THREATENED_SQUARE_MAX,
            threatened_piece: shares[(offset + 1) % 3] / THREATENED_PIECE_MAX,
            occupied_centre: shares[(offset + 2) % 3] / OCCUPIED_CENTRE_MAX,
        }
    }

    pub fn average(&self, other: &WeightingConfig) -> Self {
        Self {
            threatened_square: (self.threatened_square + other.threatened_square) / 2.0,
            threatened_piece: (self.threatened_piece + other.threatened_piece) / 2.0,
            occupied_centre: (self.occupied_centre + other.occupied_centre) / 2.0,
        }
    }

    /// Largest tie-break this configuration can produce.
    pub fn max_weighting(&self) -> f64 {
        self.threatened_square * THREATENED_SQUARE_MAX
            + self.threatened_piece * THREATENED_PIECE_MAX
            + self.occupied_centre * OCCUPIED_CENTRE_MAX
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideWeightings {
    pub light: WeightingConfig,
    pub dark: WeightingConfig,
}

impl SideWeightings {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            light: WeightingConfig::random(rng),
            dark: WeightingConfig::random(rng),
        }
    }

    #[inline]
    pub fn for_color(&self, color: Color) -> &WeightingConfig {
        match color {
            Color::Light => &self.light,
            Color::Dark => &self.dark,
        }
    }

    /// Keeps the average of both sides for Light and draws a fresh Dark.
    pub fn breed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.light = self.light.average(&self.dark);
        self.dark = WeightingConfig::random(rng);
        info!("bred weightings: light {:?}, dark {:?}", self.light, self.dark);
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.light, &mut self.dark);
    }
}

/// Positional tie-break for the side that just moved into the position
/// described by `child_flags`.
///
/// In the child the mover is the opponent, so `threatened` is what the mover
/// attacks and `opponent` is the mover's own pieces.
pub fn tie_break(child_flags: &DerivedFlags, weights: &WeightingConfig) -> f64 {
    let attacked = child_flags.threatened.count_ones() as f64;
    let attacked_pieces = (child_flags.threatened & child_flags.player).count_ones() as f64;
    let own_centre = (CENTRE_MASK & child_flags.opponent).count_ones() as f64;
    let their_centre = (CENTRE_MASK & child_flags.player).count_ones() as f64;

    weights.threatened_square * attacked
        + weights.threatened_piece * attacked_pieces
        + weights.occupied_centre * own_centre
        - weights.occupied_centre * their_centre
}

/// Material gained by the side to move in `parent` by reaching `child`.
pub fn material_swing(parent: &GameState, child: &GameState) -> f64 {
    let mover = parent.side_to_move;
    f64::from(material_balance(child, mover) - material_balance(parent, mover))
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::game_state::derived_flags::derive_flags;
    use crate::move_generation::legal_move_apply::apply_move;

    #[test]
    fn start_position_is_balanced() {
        let game = GameState::new_game();
        assert_eq!(material_balance(&game, Color::Light), 0);
        assert_eq!(material_balance(&game, Color::Dark), 0);
    }

    #[test]
    fn centre_mask_covers_the_four_central_squares() {
        assert_eq!(CENTRE_MASK, 103_481_868_288);
    }

    #[test]
    fn capture_swing_is_the_captured_value() {
        let parent = GameState::from_fen("7k/8/8/q7/1P6/8/8/7K w - - 0 1").expect("test FEN should parse");
        let child = apply_move(&parent, ChessMove::new(25, 32));
        assert_eq!(material_swing(&parent, &child), 9.0);
        let quiet = apply_move(&parent, ChessMove::new(25, 33));
        assert_eq!(material_swing(&parent, &quiet), 0.0);
    }

    #[test]
    fn tie_break_rewards_central_pawn() {
        let parent = GameState::new_game();
        let weights = WeightingConfig::default();
        let value = |chess_move| {
            let child = apply_move(&parent, chess_move);
            tie_break(&derive_flags(&child), &weights)
        };
        assert!(value(ChessMove::new(12, 28)) > value(ChessMove::new(8, 16)));
    }

    #[test]
    fn random_weightings_spend_a_unit_budget() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..16 {
            let weights = WeightingConfig::random(&mut rng);
            assert!((weights.max_weighting() - 1.0).abs() < 1e-9);
            assert!(weights.threatened_square >= 0.0);
            assert!(weights.threatened_piece >= 0.0);
            assert!(weights.occupied_centre >= 0.0);
        }
    }

    #[test]
    fn breeding_averages_into_light() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sides = SideWeightings::random(&mut rng);
        let expected = sides.light.average(&sides.dark);
        sides.breed(&mut rng);
        assert_eq!(sides.light, expected);

        let before = sides;
        sides.swap();
        assert_eq!(sides.light, before.dark);
        assert_eq!(sides.dark, before.light);
    }
}
