//! Legal knight move generation.
//!
//! A pinned knight has no collinear jump, so the pin filter leaves it with no
//! moves at all.

use crate::game_state::chess_types::{ChessMove, Square};
use crate::game_state::derived_flags::DerivedFlags;
use crate::move_generation::legal_move_shared::walk_limits;
use crate::moves::directional_limits::KNIGHT_LIMITS;

pub fn generate_knight_moves(flags: &DerivedFlags, from: Square, out: &mut Vec<ChessMove>) {
    walk_limits(flags, from, &KNIGHT_LIMITS, out);
}
