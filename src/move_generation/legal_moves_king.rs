//! Legal king move generation, including castling.
//!
//! King steps only need the threatened mask: the threat sweep already marks
//! squares behind the king on a checking ray and squares defended by the
//! opponent.

use crate::game_state::chess_types::*;
use crate::game_state::derived_flags::DerivedFlags;
use crate::moves::directional_limits::king_limits;

pub fn generate_king_moves(flags: &DerivedFlags, side: Color, from: Square, out: &mut Vec<ChessMove>) {
    for limit in king_limits(side, from) {
        let Some(first) = offset_square(from, limit.dx, limit.dy) else {
            continue;
        };
        let first_bit = square_bit(first);
        if (flags.player | flags.threatened) & first_bit != 0 {
            continue;
        }
        out.push(ChessMove::new(from, first));

        if limit.max_steps < 2 || flags.opponent & first_bit != 0 || flags.is_in_check() {
            continue;
        }
        if let Some(castle) = castle_destination(flags, first, limit.dx) {
            out.push(ChessMove::new(from, castle));
        }
    }
}

/// Second step of a castle, given the already-validated first step.
fn castle_destination(flags: &DerivedFlags, first: Square, dx: i8) -> Option<Square> {
    let second = offset_square(first, dx, 0)?;
    let bit = square_bit(second);
    if flags.castle_available & bit == 0 || (flags.occupied() | flags.threatened) & bit != 0 {
        return None;
    }
    if dx < 0 {
        // Long castle also needs the square beside the rook empty.
        let beside_rook = offset_square(second, -1, 0)?;
        if flags.occupied() & square_bit(beside_rook) != 0 {
            return None;
        }
    }
    Some(second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::derived_flags::derive_flags;
    use crate::game_state::game_state::GameState;

    fn king_targets(fen: &str) -> Vec<Square> {
        let game = GameState::from_fen(fen).expect("test FEN should parse");
        let flags = derive_flags(&game);
        let from = flags.king_square.expect("side to move should have a king");
        let mut out = Vec::new();
        generate_king_moves(&flags, game.side_to_move, from, &mut out);
        let mut targets: Vec<Square> = out.iter().map(|m| m.to).collect();
        targets.sort_unstable();
        targets
    }

    #[test]
    fn both_castles_available_on_clear_back_rank() {
        let targets = king_targets("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(targets.contains(&2));
        assert!(targets.contains(&6));
    }

    #[test]
    fn castling_through_attacked_square_is_refused() {
        // Black rook f8 covers f1, so only the long castle remains.
        let targets = king_targets("5r1k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!targets.contains(&6));
        assert!(targets.contains(&2));
    }

    #[test]
    fn long_castle_needs_b_file_empty() {
        let targets = king_targets("7k/8/8/8/8/8/8/RN2K3 w Q - 0 1");
        assert!(!targets.contains(&2));
    }

    #[test]
    fn no_castling_out_of_check() {
        let targets = king_targets("4r2k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!targets.contains(&2));
        assert!(!targets.contains(&6));
    }

    #[test]
    fn king_does_not_capture_defended_piece() {
        // The queen on d2 is defended by the rook on d8.
        let targets = king_targets("3r3k/8/8/8/8/8/3q4/4K3 w - - 0 1");
        // Only f1 is neither attacked nor occupied.
        assert_eq!(targets, vec![5]);
    }
}
