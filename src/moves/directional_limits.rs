//! Directional limits: the `(dx, dy, max_steps)` rays each piece travels.
//!
//! Ray order is significant: generation and threat sweeps walk limits in the
//! order listed here, which fixes the order successors are produced in.

use crate::game_state::chess_rules::{DARK_KING_START, LIGHT_KING_START};
use crate::game_state::chess_types::{square_rank, Color, PieceKind, Square};

/// One ray: file step, rank step, and the furthest number of steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalLimit {
    pub dx: i8,
    pub dy: i8,
    pub max_steps: u8,
}

impl DirectionalLimit {
    #[inline]
    pub const fn new(dx: i8, dy: i8, max_steps: u8) -> Self {
        Self { dx, dy, max_steps }
    }

    #[inline]
    pub const fn is_knight_offset(self) -> bool {
        self.dx.abs() == 2 || self.dy.abs() == 2
    }
}

const fn limits<const N: usize>(steps: [(i8, i8); N], max_steps: u8) -> [DirectionalLimit; N] {
    let mut out = [DirectionalLimit::new(0, 0, 0); N];
    let mut i = 0;
    while i < N {
        out[i] = DirectionalLimit::new(steps[i].0, steps[i].1, max_steps);
        i += 1;
    }
    out
}

pub const KNIGHT_LIMITS: [DirectionalLimit; 8] = limits(
    [(-1, -2), (1, -2), (-2, -1), (2, -1), (-2, 1), (2, 1), (-1, 2), (1, 2)],
    1,
);

pub const BISHOP_LIMITS: [DirectionalLimit; 4] = limits([(-1, -1), (1, -1), (-1, 1), (1, 1)], 7);

pub const ROOK_LIMITS: [DirectionalLimit; 4] = limits([(0, -1), (-1, 0), (1, 0), (0, 1)], 7);

pub const QUEEN_LIMITS: [DirectionalLimit; 8] = limits(
    [(-1, -1), (1, -1), (-1, 1), (1, 1), (0, -1), (-1, 0), (1, 0), (0, 1)],
    7,
);

pub const KING_LIMITS: [DirectionalLimit; 8] = limits(
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)],
    1,
);

const LIGHT_PAWN_LIMITS: [DirectionalLimit; 3] = [
    DirectionalLimit::new(-1, 1, 1),
    DirectionalLimit::new(0, 1, 2),
    DirectionalLimit::new(1, 1, 1),
];

const DARK_PAWN_LIMITS: [DirectionalLimit; 3] = [
    DirectionalLimit::new(1, -1, 1),
    DirectionalLimit::new(0, -1, 2),
    DirectionalLimit::new(-1, -1, 1),
];

/// Limits for sliding and leaping pieces; pawns and kings depend on the square.
pub fn fixed_limits(piece: PieceKind) -> &'static [DirectionalLimit] {
    match piece {
        PieceKind::Knight => &KNIGHT_LIMITS,
        PieceKind::Bishop => &BISHOP_LIMITS,
        PieceKind::Rook => &ROOK_LIMITS,
        PieceKind::Queen => &QUEEN_LIMITS,
        PieceKind::King => &KING_LIMITS,
        PieceKind::Pawn => &[],
    }
}

/// Pawn rays from `square`; the forward ray shortens to one step off the start rank.
pub fn pawn_limits(color: Color, square: Square) -> [DirectionalLimit; 3] {
    let (mut out, start_rank) = match color {
        Color::Light => (LIGHT_PAWN_LIMITS, 1),
        Color::Dark => (DARK_PAWN_LIMITS, 6),
    };
    if square_rank(square) != start_rank {
        out[1].max_steps = 1;
    }
    out
}

/// King rays from `square`; the lateral rays reach two squares from the start square.
pub fn king_limits(color: Color, square: Square) -> [DirectionalLimit; 8] {
    let mut out = KING_LIMITS;
    let start = match color {
        Color::Light => LIGHT_KING_START,
        Color::Dark => DARK_KING_START,
    };
    if square == start {
        for limit in out.iter_mut().filter(|limit| limit.dy == 0) {
            limit.max_steps = 2;
        }
    }
    out
}

/// Pawn capture offsets used when marking threatened squares.
#[inline]
pub fn pawn_capture_offsets(color: Color) -> [(i8, i8); 2] {
    let dy = color.forward();
    [(-1, dy), (1, dy)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pawn_forward_ray_is_two_only_on_start_rank() {
        assert_eq!(pawn_limits(Color::Light, 12)[1].max_steps, 2);
        assert_eq!(pawn_limits(Color::Light, 20)[1].max_steps, 1);
        assert_eq!(pawn_limits(Color::Dark, 52)[1].max_steps, 2);
        assert_eq!(pawn_limits(Color::Dark, 12)[1].max_steps, 1);
    }

    #[test]
    fn king_reaches_two_files_only_from_home() {
        let home = king_limits(Color::Light, 4);
        assert_eq!(home.iter().filter(|l| l.max_steps == 2).count(), 2);
        let away = king_limits(Color::Light, 60);
        assert!(away.iter().all(|l| l.max_steps == 1));
    }
}
