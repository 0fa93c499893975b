//! State transition: one position plus one move yields the next position.
//!
//! The move is assumed to come from the generator. Nothing here re-validates
//! legality; a move whose source square is empty only advances the clocks and
//! the side to move.

use crate::game_state::chess_rules::{CASTLING_ROOK_MOVES, ROOK_CORNERS};
use crate::game_state::chess_types::*;

pub fn apply_move(game_state: &GameState, chess_move: ChessMove) -> GameState {
    let ChessMove { from, to, promotion } = chess_move;
    let moving_color = game_state.side_to_move;
    let mut next = game_state.clone();

    let moved_piece = next.remove_piece(from).map(|(_, piece)| piece);
    let mut is_capture = next.remove_piece(to).is_some();

    if moved_piece == Some(PieceKind::Pawn) && !is_capture && game_state.en_passant_square == Some(to) {
        if let Some(captured) = offset_square(to, 0, -moving_color.forward()) {
            is_capture = next.remove_piece(captured).is_some();
        }
    }

    if let Some(piece) = moved_piece {
        next.place_piece(moving_color, promotion.unwrap_or(piece), to);
    }

    if moved_piece == Some(PieceKind::King) {
        if from.abs_diff(to) == 2 {
            if let Some((_, rook_from, rook_to)) = CASTLING_ROOK_MOVES.iter().find(|(king_to, _, _)| *king_to == to) {
                if next.remove_piece(*rook_from).is_some() {
                    next.place_piece(moving_color, PieceKind::Rook, *rook_to);
                }
            }
        }
        next.castling_rights &= !castle_rights_for(moving_color);
    }

    for (corner, destination) in ROOK_CORNERS {
        if from == corner || to == corner {
            next.castling_rights &= !castle_right_for_destination(destination);
        }
    }

    next.en_passant_square = if moved_piece == Some(PieceKind::Pawn) && from.abs_diff(to) == 16 {
        Some((from + to) / 2)
    } else {
        None
    };

    if moved_piece == Some(PieceKind::Pawn) || is_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Dark {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }
    next.side_to_move = moving_color.opposite();

    next
}

fn castle_right_for_destination(destination: Square) -> CastlingRights {
    CASTLE_DESTINATIONS
        .iter()
        .find(|(_, square)| *square == destination)
        .map_or(0, |(right, _)| *right)
}
