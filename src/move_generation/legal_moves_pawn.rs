//! Legal pawn move generation.
//!
//! Covers single and double pushes, diagonal captures, en passant and the
//! four-way promotion fan-out on the last rank.

use crate::game_state::chess_types::*;
use crate::game_state::derived_flags::DerivedFlags;
use crate::moves::directional_limits::pawn_limits;

pub fn generate_pawn_moves(flags: &DerivedFlags, side: Color, from: Square, out: &mut Vec<ChessMove>) {
    let pin = flags.pin_direction(from);

    for limit in pawn_limits(side, from) {
        if pin.is_some_and(|direction| !direction.permits(limit)) {
            continue;
        }

        if limit.dx == 0 {
            let mut square = from;
            for _ in 0..limit.max_steps {
                let Some(next) = offset_square(square, limit.dx, limit.dy) else {
                    break;
                };
                square = next;
                if flags.occupied() & square_bit(square) != 0 {
                    break;
                }
                if flags.blocks_check(square) {
                    push_pawn_move(side, from, square, out);
                }
            }
            continue;
        }

        let Some(target) = offset_square(from, limit.dx, limit.dy) else {
            continue;
        };
        let bit = square_bit(target);
        if flags.opponent & bit != 0 {
            if flags.blocks_check(target) {
                push_pawn_move(side, from, target, out);
            }
        } else if flags.en_passant & bit != 0 {
            // The captured pawn sits behind the target; taking it may itself end the check.
            let resolves = flags.blocks_check(target)
                || offset_square(target, 0, -side.forward()).is_some_and(|captured| flags.blocks_check(captured));
            if resolves {
                out.push(ChessMove::new(from, target));
            }
        }
    }
}

fn push_pawn_move(side: Color, from: Square, to: Square, out: &mut Vec<ChessMove>) {
    let last_rank = match side {
        Color::Light => 7,
        Color::Dark => 0,
    };
    if square_rank(to) == last_rank {
        for promotion in PROMOTION_KINDS {
            out.push(ChessMove::with_promotion(from, to, promotion));
        }
    } else {
        out.push(ChessMove::new(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::derived_flags::derive_flags;
    use crate::game_state::game_state::GameState;

    fn pawn_moves(fen: &str, from: Square) -> Vec<ChessMove> {
        let game = GameState::from_fen(fen).expect("test FEN should parse");
        let flags = derive_flags(&game);
        let mut out = Vec::new();
        generate_pawn_moves(&flags, game.side_to_move, from, &mut out);
        out
    }

    #[test]
    fn start_rank_pawn_pushes_one_or_two() {
        let moves = pawn_moves(crate::game_state::chess_rules::STARTING_POSITION_FEN, 12);
        assert_eq!(moves, vec![ChessMove::new(12, 20), ChessMove::new(12, 28)]);
    }

    #[test]
    fn blocked_pawn_cannot_push_or_jump() {
        assert!(pawn_moves("7k/8/8/8/8/4p3/4P3/K7 w - - 0 1", 12).is_empty());
    }

    #[test]
    fn promotion_fans_out_to_four_pieces() {
        let moves = pawn_moves("7k/P7/8/8/8/8/8/K7 w - - 0 1", 48);
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.to == 56 && m.promotion.is_some()));
    }

    #[test]
    fn capture_promotion_and_push_promotion_both_fan_out() {
        let moves = pawn_moves("1r5k/P7/8/8/8/8/8/K7 w - - 0 1", 48);
        assert_eq!(moves.len(), 8);
    }

    #[test]
    fn en_passant_target_is_capturable() {
        let moves = pawn_moves("7k/8/8/3pP3/8/8/8/K7 w - d6 0 2", 36);
        assert!(moves.contains(&ChessMove::new(36, 43)));
        assert!(moves.contains(&ChessMove::new(36, 44)));
    }

    #[test]
    fn en_passant_removes_checking_pawn() {
        // The d5 pawn just advanced and gives check to the king on e4.
        let moves = pawn_moves("7k/8/8/3pP3/4K3/8/8/8 w - d6 0 2", 36);
        assert_eq!(moves, vec![ChessMove::new(36, 43)]);
    }
}
