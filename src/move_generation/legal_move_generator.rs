//! Legal successor generation.
//!
//! Derives the flags once, walks the side to move's pieces square by square,
//! and packages every candidate with the position it produces. The derived
//! flags make every candidate legal except en-passant captures, which are
//! re-checked against the successor.

use crate::game_state::chess_types::*;
use crate::game_state::derived_flags::{derive_flags, DerivedFlags};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::generate_slider_moves;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMove {
    pub chess_move: ChessMove,
    pub game_after_move: GameState,
}

#[inline]
pub fn generate_legal_moves(game_state: &GameState) -> Vec<GeneratedMove> {
    let flags = derive_flags(game_state);
    generate_legal_moves_with_flags(game_state, &flags)
}

/// Same as [`generate_legal_moves`] for callers that already hold the flags.
pub fn generate_legal_moves_with_flags(game_state: &GameState, flags: &DerivedFlags) -> Vec<GeneratedMove> {
    let candidates = generate_candidate_moves(game_state, flags);
    let side = game_state.side_to_move;

    candidates
        .into_iter()
        .filter_map(|chess_move| {
            let game_after_move = apply_move(game_state, chess_move);
            if is_en_passant_capture(game_state, chess_move) && is_king_in_check(&game_after_move, side) {
                return None;
            }
            Some(GeneratedMove {
                chess_move,
                game_after_move,
            })
        })
        .collect()
}

/// Moves for the side to move, in ascending source-square order.
pub fn generate_candidate_moves(game_state: &GameState, flags: &DerivedFlags) -> Vec<ChessMove> {
    let side = game_state.side_to_move;
    let mut out = Vec::with_capacity(48);

    let mut own = flags.player;
    while own != 0 {
        let from = own.trailing_zeros() as Square;
        match game_state.piece_on(side, from) {
            Some(PieceKind::Pawn) => generate_pawn_moves(flags, side, from, &mut out),
            Some(PieceKind::Knight) => generate_knight_moves(flags, from, &mut out),
            Some(PieceKind::King) => generate_king_moves(flags, side, from, &mut out),
            Some(piece) => generate_slider_moves(flags, piece, from, &mut out),
            None => {}
        }
        own &= own - 1;
    }

    out
}

#[inline]
fn is_en_passant_capture(game_state: &GameState, chess_move: ChessMove) -> bool {
    game_state.en_passant_square == Some(chess_move.to)
        && square_file(chess_move.from) != square_file(chess_move.to)
        && game_state.piece_on(game_state.side_to_move, chess_move.from) == Some(PieceKind::Pawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    fn successors(fen: &str) -> Vec<GeneratedMove> {
        generate_legal_moves(&GameState::from_fen(fen).expect("test FEN should parse"))
    }

    #[test]
    fn start_position_has_twenty_successors() {
        assert_eq!(successors(STARTING_POSITION_FEN).len(), 20);
    }

    #[test]
    fn no_successor_leaves_mover_in_check() {
        let fens = [
            STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            "4r2k/8/8/3n4/8/8/8/4K3 w - - 0 1",
        ];
        for fen in fens {
            let game = GameState::from_fen(fen).expect("test FEN should parse");
            for generated in generate_legal_moves(&game) {
                assert!(
                    !is_king_in_check(&generated.game_after_move, game.side_to_move),
                    "{fen} -> {:?}",
                    generated.chess_move
                );
            }
        }
    }

    #[test]
    fn double_check_forces_king_moves() {
        let moves = successors("4r2k/8/8/8/8/3n4/3P4/4K3 w - - 0 1");
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.chess_move.from == 4));
    }

    #[test]
    fn horizontal_en_passant_discovery_is_rejected() {
        // Taking en passant would clear the fifth rank between the rook and king.
        let moves = successors("7k/8/8/KPp4r/8/8/8/8 w - c6 0 2");
        assert!(moves.iter().all(|m| m.chess_move.to != 42));
    }

    #[test]
    fn en_passant_target_lasts_one_ply() {
        let game = GameState::from_fen("7k/8/8/8/3p4/8/4P3/K7 w - - 0 1").expect("test FEN should parse");
        let pushed = generate_legal_moves(&game)
            .into_iter()
            .find(|m| m.chess_move == ChessMove::new(12, 28))
            .expect("double push should be generated");
        assert_eq!(pushed.game_after_move.en_passant_square, Some(20));

        let replies = generate_legal_moves(&pushed.game_after_move);
        assert!(replies.iter().any(|m| m.chess_move == ChessMove::new(27, 20)));
        for reply in replies.iter().filter(|m| m.chess_move != ChessMove::new(27, 20)) {
            assert_eq!(reply.game_after_move.en_passant_square, None);
            for white in generate_legal_moves(&reply.game_after_move) {
                let black = generate_legal_moves(&white.game_after_move);
                assert!(black.iter().all(|m| m.chess_move != ChessMove::new(27, 20)));
            }
        }
    }

    #[test]
    fn checkmated_side_has_no_successors() {
        assert!(successors("k7/7R/8/3B4/8/8/P1PPPPPP/1R2K3 b - - 1 1").is_empty());
    }

    #[test]
    fn stalemated_side_has_no_successors() {
        assert!(successors("k7/2Q5/8/8/8/8/8/7K b - - 0 1").is_empty());
    }
}
