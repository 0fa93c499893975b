//! Core board state representation.
//!
//! `GameState` stores one bitboard per (colour, piece kind), occupancy caches,
//! and the auxiliary scalar state: side to move, castling rights, en-passant
//! target, and the two move clocks. Positions are values; search never
//! mutates a state it did not just create.

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_on(&self, color: Color, square: Square) -> Option<PieceKind> {
        let mask = square_bit(square);
        if self.occupancy_by_color[color.index()] & mask == 0 {
            return None;
        }
        ALL_PIECE_KINDS
            .into_iter()
            .find(|piece| self.pieces[color.index()][piece.index()] & mask != 0)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceKind)> {
        [Color::Light, Color::Dark]
            .into_iter()
            .find_map(|color| self.piece_on(color, square).map(|piece| (color, piece)))
    }

    /// Square of `color`'s king, if one is on the board.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces[color.index()][PieceKind::King.index()];
        (kings != 0).then(|| kings.trailing_zeros() as Square)
    }

    #[inline]
    pub fn place_piece(&mut self, color: Color, piece: PieceKind, square: Square) {
        let mask = square_bit(square);
        self.pieces[color.index()][piece.index()] |= mask;
        self.occupancy_by_color[color.index()] |= mask;
        self.occupancy_all |= mask;
    }

    /// Clears whatever occupies `square`, returning it.
    #[inline]
    pub fn remove_piece(&mut self, square: Square) -> Option<(Color, PieceKind)> {
        let found = self.piece_at(square)?;
        let mask = !square_bit(square);
        self.pieces[found.0.index()][found.1.index()] &= mask;
        self.occupancy_by_color[found.0.index()] &= mask;
        self.occupancy_all &= mask;
        Some(found)
    }

    pub fn refresh_occupancy(&mut self) {
        for color in [Color::Light, Color::Dark] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all =
            self.occupancy_by_color[Color::Light.index()] | self.occupancy_by_color[Color::Dark.index()];
    }
}
