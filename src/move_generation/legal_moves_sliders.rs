//! Legal bishop, rook and queen move generation.

use crate::game_state::chess_types::{ChessMove, PieceKind, Square};
use crate::game_state::derived_flags::DerivedFlags;
use crate::move_generation::legal_move_shared::walk_limits;
use crate::moves::directional_limits::fixed_limits;

pub fn generate_slider_moves(
    flags: &DerivedFlags,
    piece: PieceKind,
    from: Square,
    out: &mut Vec<ChessMove>,
) {
    walk_limits(flags, from, fixed_limits(piece), out);
}
