//! Compact 16-bit move encoding used for search memo keys.

use crate::game_state::chess_types::{ChessMove, PieceKind, Square};

const FROM_SHIFT: u16 = 6;
const PROMOTION_SHIFT: u16 = 12;

const SQUARE_MASK: u16 = 0x3F;
const PROMOTION_MASK: u16 = 0x7;
pub const NO_PROMOTION_CODE: u16 = 0;

/// Packs a move into 16 bits: `promotion << 12 | from << 6 | to`.
#[inline]
pub fn pack_move(chess_move: ChessMove) -> u16 {
    let promotion = chess_move
        .promotion
        .map(promotion_code)
        .unwrap_or(NO_PROMOTION_CODE);
    (promotion << PROMOTION_SHIFT) | ((chess_move.from as u16) << FROM_SHIFT) | chess_move.to as u16
}

#[inline]
pub fn unpack_move(packed: u16) -> ChessMove {
    ChessMove {
        from: ((packed >> FROM_SHIFT) & SQUARE_MASK) as Square,
        to: (packed & SQUARE_MASK) as Square,
        promotion: promotion_from_code((packed >> PROMOTION_SHIFT) & PROMOTION_MASK),
    }
}

#[inline]
fn promotion_code(piece: PieceKind) -> u16 {
    match piece {
        PieceKind::Knight => 1,
        PieceKind::Bishop => 2,
        PieceKind::Rook => 3,
        PieceKind::Queen => 4,
        PieceKind::Pawn | PieceKind::King => NO_PROMOTION_CODE,
    }
}

#[inline]
fn promotion_from_code(code: u16) -> Option<PieceKind> {
    match code {
        1 => Some(PieceKind::Knight),
        2 => Some(PieceKind::Bishop),
        3 => Some(PieceKind::Rook),
        4 => Some(PieceKind::Queen),
        _ => None,
    }
}
