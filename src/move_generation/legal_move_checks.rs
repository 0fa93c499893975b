//! Direct attack queries on a position, independent of derived flags.
//!
//! Used to verify en-passant captures (which remove two pieces from one rank)
//! and by tests that re-check generated successors.

use crate::game_state::chess_types::*;
use crate::moves::directional_limits::{
    pawn_capture_offsets, DirectionalLimit, BISHOP_LIMITS, KING_LIMITS, KNIGHT_LIMITS, ROOK_LIMITS,
};

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = game_state.king_square(color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let attackers = &game_state.pieces[attacker_color.index()];
    let has = |piece: PieceKind, at: Square| attackers[piece.index()] & square_bit(at) != 0;

    // A pawn attacks `square` from the square one capture offset behind it.
    let pawn_hit = pawn_capture_offsets(attacker_color)
        .into_iter()
        .filter_map(|(dx, dy)| offset_square(square, -dx, -dy))
        .any(|from| has(PieceKind::Pawn, from));
    if pawn_hit {
        return true;
    }

    let leaper_hit = |limits: &[DirectionalLimit], piece: PieceKind| {
        limits
            .iter()
            .filter_map(|limit| offset_square(square, limit.dx, limit.dy))
            .any(|from| has(piece, from))
    };
    if leaper_hit(&KNIGHT_LIMITS, PieceKind::Knight) || leaper_hit(&KING_LIMITS, PieceKind::King) {
        return true;
    }

    slider_hit(game_state, square, &BISHOP_LIMITS, attackers, PieceKind::Bishop)
        || slider_hit(game_state, square, &ROOK_LIMITS, attackers, PieceKind::Rook)
}

fn slider_hit(
    game_state: &GameState,
    square: Square,
    limits: &[DirectionalLimit],
    attackers: &[u64; 6],
    piece: PieceKind,
) -> bool {
    let sliders = attackers[piece.index()] | attackers[PieceKind::Queen.index()];
    limits.iter().any(|limit| {
        let mut current = square;
        while let Some(next) = offset_square(current, limit.dx, limit.dy) {
            current = next;
            let bit = square_bit(current);
            if game_state.occupancy_all & bit != 0 {
                return sliders & bit != 0;
            }
        }
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_attacker_kind() {
        let cases = [
            ("7k/8/8/8/8/8/3p4/4K3 w - - 0 1", true),
            ("7k/8/8/8/8/5n2/8/4K3 w - - 0 1", true),
            ("7k/8/8/8/1b6/8/8/4K3 w - - 0 1", true),
            ("4r2k/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4r2k/8/8/8/4N3/8/8/4K3 w - - 0 1", false),
            ("7k/8/8/8/8/8/4p3/4K3 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let game = GameState::from_fen(fen).expect("test FEN should parse");
            assert_eq!(is_king_in_check(&game, Color::Light), expected, "{fen}");
        }
    }
}
