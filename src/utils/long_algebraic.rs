//! Coordinate move notation: `<from><to>[q|r|b|n]`.
//!
//! The writer can insert an `x` between the squares of a capture for human
//! readers; the parser accepts text with or without it.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::{generate_legal_moves, GeneratedMove};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_to_long_algebraic(chess_move: ChessMove) -> Result<String, String> {
    let mut out = square_to_algebraic(chess_move.from)?;
    out.push_str(&square_to_algebraic(chess_move.to)?);
    if let Some(promotion) = chess_move.promotion {
        out.push(promotion_to_char(promotion)?);
    }
    Ok(out)
}

/// Writes `chess_move` with an `x` capture marker when it removes a piece from `game_state`.
pub fn describe_move(game_state: &GameState, chess_move: ChessMove) -> Result<String, String> {
    let is_en_passant = game_state.en_passant_square == Some(chess_move.to)
        && game_state.piece_on(game_state.side_to_move, chess_move.from) == Some(PieceKind::Pawn)
        && square_file(chess_move.from) != square_file(chess_move.to);
    let is_capture = is_en_passant
        || game_state.occupancy_by_color[game_state.side_to_move.opposite().index()] & square_bit(chess_move.to) != 0;

    let mut out = square_to_algebraic(chess_move.from)?;
    if is_capture {
        out.push('x');
    }
    out.push_str(&square_to_algebraic(chess_move.to)?);
    if let Some(promotion) = chess_move.promotion {
        out.push(promotion_to_char(promotion)?);
    }
    Ok(out)
}

pub fn long_algebraic_to_move(long_algebraic: &str) -> Result<ChessMove, String> {
    let stripped: String = long_algebraic.trim().chars().filter(|ch| *ch != 'x').collect();
    if !stripped.is_ascii() || (stripped.len() != 4 && stripped.len() != 5) {
        return Err(format!("Invalid long algebraic move: {long_algebraic}"));
    }

    let from = algebraic_to_square(&stripped[0..2])?;
    let to = algebraic_to_square(&stripped[2..4])?;
    let promotion = match stripped[4..].chars().next() {
        Some(ch) => Some(char_to_promotion(ch)?),
        None => None,
    };

    Ok(ChessMove { from, to, promotion })
}

/// Parses `long_algebraic` and returns the matching legal successor of `game_state`.
pub fn long_algebraic_to_generated_move(long_algebraic: &str, game_state: &GameState) -> Result<GeneratedMove, String> {
    let chess_move = long_algebraic_to_move(long_algebraic)?;
    generate_legal_moves(game_state)
        .into_iter()
        .find(|generated| generated.chess_move == chess_move)
        .ok_or_else(|| format!("Move {long_algebraic} is not legal in {}", game_state.get_fen()))
}

fn promotion_to_char(piece: PieceKind) -> Result<char, String> {
    match piece {
        PieceKind::Queen => Ok('q'),
        PieceKind::Rook => Ok('r'),
        PieceKind::Bishop => Ok('b'),
        PieceKind::Knight => Ok('n'),
        _ => Err(format!("Invalid promotion piece: {piece:?}")),
    }
}

fn char_to_promotion(ch: char) -> Result<PieceKind, String> {
    match ch {
        'q' => Ok(PieceKind::Queen),
        'r' => Ok(PieceKind::Rook),
        'b' => Ok(PieceKind::Bishop),
        'n' => Ok(PieceKind::Knight),
        _ => Err(format!("Invalid promotion piece character: {ch}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_parses_plain_and_promotion_moves() {
        let push = ChessMove::new(12, 28);
        assert_eq!(move_to_long_algebraic(push).expect("should write"), "e2e4");
        assert_eq!(long_algebraic_to_move("e2e4").expect("should parse"), push);

        let promo = ChessMove::with_promotion(48, 56, PieceKind::Queen);
        assert_eq!(move_to_long_algebraic(promo).expect("should write"), "a7a8q");
        assert_eq!(long_algebraic_to_move("a7a8q").expect("should parse"), promo);
    }

    #[test]
    fn capture_marker_is_written_but_optional_when_parsing() {
        let game = GameState::from_fen("4k3/8/8/3q1p2/4P3/8/8/4K3 w - - 0 1").expect("test FEN should parse");
        let capture = ChessMove::new(28, 35);
        assert_eq!(describe_move(&game, capture).expect("should describe"), "e4xd5");
        assert_eq!(describe_move(&game, ChessMove::new(28, 36)).expect("should describe"), "e4e5");
        assert_eq!(long_algebraic_to_move("e4xd5").expect("should parse"), capture);
        assert_eq!(long_algebraic_to_move("e4d5").expect("should parse"), capture);
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "e2", "e2e9", "e2e4k", "e2e4Q", "e2e4qq"] {
            assert!(long_algebraic_to_move(text).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn resolves_only_legal_moves() {
        let game = GameState::new_game();
        let generated = long_algebraic_to_generated_move("g1f3", &game).expect("g1f3 is legal");
        assert_eq!(generated.game_after_move.piece_at(21), Some((Color::Light, PieceKind::Knight)));
        assert!(long_algebraic_to_generated_move("e2e5", &game).is_err());
    }
}
