//! Canonical chess-rule constants.
//!
//! Starting position, fifty-move exclusion threshold, and the fixed rook
//! relocations performed when a king castles.

use crate::game_state::chess_types::Square;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Successors whose half-move clock exceeds this are never selected by search.
pub const FIFTY_MOVE_HALFMOVE_LIMIT: u16 = 99;

/// Book lookups are only attempted before this full-move number.
pub const OPENING_BOOK_MOVE_LIMIT: u16 = 4;

pub const LIGHT_KING_START: Square = 4;
pub const DARK_KING_START: Square = 60;

/// `(king destination, rook origin, rook destination)` for each castle.
pub const CASTLING_ROOK_MOVES: [(Square, Square, Square); 4] =
    [(2, 0, 3), (6, 7, 5), (58, 56, 59), (62, 63, 61)];

/// Corner squares whose rook departure or capture revokes the paired right.
pub const ROOK_CORNERS: [(Square, Square); 4] = [(0, 2), (7, 6), (56, 58), (63, 62)];
