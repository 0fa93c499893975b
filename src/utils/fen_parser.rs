//! FEN-to-GameState parser.
//!
//! Builds piece bitboards, rights, clocks and occupancies from a
//! Forsyth-Edwards Notation string. Malformed text is rejected with a
//! descriptive message, as is any spelling the writer would not produce
//! (castling out of `KQkq` order, split empty runs, padded numbers), so
//! every accepted string is written back unchanged. Chess legality (king
//! counts, pawns on the back rank) is not checked.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, String> {
    if fen.split(' ').any(str::is_empty) {
        return Err("FEN fields must be separated by single spaces".to_owned());
    }
    let mut parts = fen.split(' ');

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next().ok_or("Missing halfmove clock in FEN")?;
    let fullmove_part = parts.next().ok_or("Missing fullmove number in FEN")?;

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
    game_state.halfmove_clock =
        parse_counter(halfmove_part).ok_or_else(|| format!("Invalid halfmove clock: {halfmove_part}"))?;
    game_state.fullmove_number =
        parse_counter(fullmove_part).ok_or_else(|| format!("Invalid fullmove number: {fullmove_part}"))?;
    if game_state.fullmove_number == 0 {
        return Err("Fullmove number must be positive".to_owned());
    }

    game_state.refresh_occupancy();
    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;
        let mut after_empty_run = false;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                if after_empty_run {
                    return Err(format!("Board rank '{rank_str}' splits an empty run"));
                }
                file += empty_count as usize;
                after_empty_run = true;
                continue;
            }
            after_empty_run = false;

            let (color, piece) = piece_from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;

            if file >= 8 {
                return Err("Board rank has too many files".to_owned());
            }

            let square = (board_rank * 8 + file) as Square;
            game_state.pieces[color.index()][piece.index()] |= square_bit(square);
            file += 1;
        }

        if file != 8 {
            return Err(format!("Board rank '{rank_str}' does not sum to 8 files"));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    let mut last_order = None;
    for ch in castling_part.chars() {
        let (order, right) = match ch {
            'K' => (0, CASTLE_LIGHT_KINGSIDE),
            'Q' => (1, CASTLE_LIGHT_QUEENSIDE),
            'k' => (2, CASTLE_DARK_KINGSIDE),
            'q' => (3, CASTLE_DARK_QUEENSIDE),
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        };
        if last_order.is_some_and(|last| order <= last) {
            return Err(format!("Castling rights must be written once each in KQkq order: {castling_part}"));
        }
        last_order = Some(order);
        rights |= right;
    }

    Ok(rights)
}

/// Plain decimal with no sign and no leading zero.
fn parse_counter(text: &str) -> Option<u16> {
    let canonical = text.bytes().all(|b| b.is_ascii_digit()) && (text == "0" || !text.starts_with('0'));
    if canonical {
        text.parse().ok()
    } else {
        None
    }
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)?;
    match square_rank(square) {
        2 | 5 => Ok(Some(square)),
        _ => Err(format!("En-passant square must be on rank 3 or 6: {en_passant_part}")),
    }
}

pub(crate) fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    let piece = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, piece))
}
