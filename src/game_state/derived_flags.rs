//! Derived per-position flags consumed by move generation and scoring.
//!
//! Everything here is recomputed from the persistent piece bitboards before
//! each generation pass and never stored on a `GameState`. One sweep over the
//! opponent's pieces yields the threatened squares, every pin (with the pin
//! direction), and the checking pieces; a final pass turns a single check into
//! the set of squares that do not resolve it.

use crate::game_state::chess_types::*;
use crate::moves::directional_limits::{fixed_limits, pawn_capture_offsets, DirectionalLimit, KING_LIMITS};

/// Direction a ray travelled when it reached the king, or a knight jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    AnyKnight,
}

impl PinDirection {
    pub const ALL: [PinDirection; 9] = [
        PinDirection::North,
        PinDirection::NorthEast,
        PinDirection::East,
        PinDirection::SouthEast,
        PinDirection::South,
        PinDirection::SouthWest,
        PinDirection::West,
        PinDirection::NorthWest,
        PinDirection::AnyKnight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PinDirection::North => 0,
            PinDirection::NorthEast => 1,
            PinDirection::East => 2,
            PinDirection::SouthEast => 3,
            PinDirection::South => 4,
            PinDirection::SouthWest => 5,
            PinDirection::West => 6,
            PinDirection::NorthWest => 7,
            PinDirection::AnyKnight => 8,
        }
    }

    /// Marker for a ray travelling by `(dx, dy)`.
    pub fn of_ray(dx: i8, dy: i8) -> Self {
        if dx.abs() == 2 || dy.abs() == 2 {
            return PinDirection::AnyKnight;
        }
        match (dx.signum(), dy.signum()) {
            (0, 1) => PinDirection::North,
            (1, 1) => PinDirection::NorthEast,
            (1, 0) => PinDirection::East,
            (1, -1) => PinDirection::SouthEast,
            (0, -1) => PinDirection::South,
            (-1, -1) => PinDirection::SouthWest,
            (-1, 0) => PinDirection::West,
            _ => PinDirection::NorthWest,
        }
    }

    /// Whether a piece pinned along this direction may still travel `limit`.
    #[inline]
    pub fn permits(self, limit: DirectionalLimit) -> bool {
        match self {
            PinDirection::North | PinDirection::South => limit.dx == 0,
            PinDirection::NorthEast | PinDirection::SouthWest => limit.dx == limit.dy,
            PinDirection::East | PinDirection::West => limit.dy == 0,
            PinDirection::SouthEast | PinDirection::NorthWest => limit.dx == -limit.dy,
            PinDirection::AnyKnight => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedFlags {
    pub player: u64,
    pub opponent: u64,
    pub threatened: u64,
    pub pins: [u64; 9],
    pub does_not_block_check: u64,
    pub castle_available: u64,
    pub en_passant: u64,
    pub checkers: u64,
    pub king_square: Option<Square>,
}

impl DerivedFlags {
    #[inline]
    pub fn occupied(&self) -> u64 {
        self.player | self.opponent
    }

    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.checkers != 0
    }

    #[inline]
    pub fn checker_count(&self) -> u32 {
        self.checkers.count_ones()
    }

    /// First pin marker on `square`, scanning in `PinDirection::ALL` order.
    #[inline]
    pub fn pin_direction(&self, square: Square) -> Option<PinDirection> {
        let bit = square_bit(square);
        PinDirection::ALL
            .into_iter()
            .find(|direction| self.pins[direction.index()] & bit != 0)
    }

    #[inline]
    pub fn blocks_check(&self, square: Square) -> bool {
        self.does_not_block_check & square_bit(square) == 0
    }
}

pub fn derive_flags(game_state: &GameState) -> DerivedFlags {
    let side = game_state.side_to_move;
    let opponent = side.opposite();

    let mut flags = DerivedFlags {
        player: game_state.occupancy_by_color[side.index()],
        opponent: game_state.occupancy_by_color[opponent.index()],
        en_passant: game_state.en_passant_square.map(square_bit).unwrap_or(0),
        castle_available: castle_available_mask(game_state.castling_rights, side),
        king_square: game_state.king_square(side),
        ..DerivedFlags::default()
    };

    let king_bit = flags.king_square.map(square_bit).unwrap_or(0);
    for piece in ALL_PIECE_KINDS {
        let mut attackers = game_state.pieces[opponent.index()][piece.index()];
        while attackers != 0 {
            let from = attackers.trailing_zeros() as Square;
            match piece {
                PieceKind::Pawn => mark_pawn_threats(&mut flags, king_bit, opponent, from),
                PieceKind::King => mark_king_threats(&mut flags, from),
                _ => sweep_rays(&mut flags, king_bit, from, fixed_limits(piece)),
            }
            attackers &= attackers - 1;
        }
    }

    flags.does_not_block_check = not_blocking_mask(&flags);
    flags
}

fn castle_available_mask(rights: CastlingRights, side: Color) -> u64 {
    let own = castle_rights_for(side);
    CASTLE_DESTINATIONS
        .iter()
        .filter(|(right, _)| rights & own & right != 0)
        .fold(0u64, |acc, (_, square)| acc | square_bit(*square))
}

fn sweep_rays(flags: &mut DerivedFlags, king_bit: u64, from: Square, limits: &[DirectionalLimit]) {
    for limit in limits {
        let marker = PinDirection::of_ray(limit.dx, limit.dy);
        let mut candidate: Option<Square> = None;
        let mut square = from;

        for _ in 0..limit.max_steps {
            let Some(next) = offset_square(square, limit.dx, limit.dy) else {
                break;
            };
            square = next;
            let bit = square_bit(square);

            match candidate {
                None => {
                    flags.threatened |= bit;
                    if flags.opponent & bit != 0 {
                        break;
                    }
                    if bit == king_bit {
                        // The king carries the marker; squares behind it stay threatened.
                        flags.pins[marker.index()] |= bit;
                        flags.checkers |= square_bit(from);
                    } else if flags.player & bit != 0 {
                        candidate = Some(square);
                    }
                }
                Some(blocker) => {
                    if bit == king_bit {
                        flags.pins[marker.index()] |= square_bit(blocker);
                        break;
                    }
                    if flags.occupied() & bit != 0 {
                        break;
                    }
                }
            }
        }
    }
}

fn mark_pawn_threats(flags: &mut DerivedFlags, king_bit: u64, pawn_color: Color, from: Square) {
    for (dx, dy) in pawn_capture_offsets(pawn_color) {
        let Some(target) = offset_square(from, dx, dy) else {
            continue;
        };
        let bit = square_bit(target);
        flags.threatened |= bit;
        if bit == king_bit {
            flags.pins[PinDirection::of_ray(dx, dy).index()] |= bit;
            flags.checkers |= square_bit(from);
        }
    }
}

fn mark_king_threats(flags: &mut DerivedFlags, from: Square) {
    for limit in KING_LIMITS {
        if let Some(target) = offset_square(from, limit.dx, limit.dy) {
            flags.threatened |= square_bit(target);
        }
    }
}

fn not_blocking_mask(flags: &DerivedFlags) -> u64 {
    if flags.checker_count() > 1 {
        return u64::MAX;
    }
    let (Some(king), true) = (flags.king_square, flags.checker_count() == 1) else {
        return 0;
    };

    let checker = flags.checkers.trailing_zeros() as Square;
    let df = square_file(checker) - square_file(king);
    let dr = square_rank(checker) - square_rank(king);
    let (dx, dy) = if df.abs() + dr.abs() == 3 && df != 0 && dr != 0 {
        (df, dr)
    } else {
        (df.signum(), dr.signum())
    };

    let mut blocks = 0u64;
    let mut square = king;
    while let Some(next) = offset_square(square, dx, dy) {
        square = next;
        blocks |= square_bit(square);
        if square == checker {
            break;
        }
    }
    !blocks
}
