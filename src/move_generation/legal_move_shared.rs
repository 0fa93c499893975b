//! Ray walking shared by every non-king piece generator.

use crate::game_state::chess_types::*;
use crate::game_state::derived_flags::DerivedFlags;
use crate::moves::directional_limits::DirectionalLimit;

/// Limits a piece on `from` may still use once its pin (if any) is applied.
#[inline]
pub fn unpinned_limits<'a>(
    flags: &DerivedFlags,
    from: Square,
    limits: &'a [DirectionalLimit],
) -> impl Iterator<Item = DirectionalLimit> + 'a {
    let pin = flags.pin_direction(from);
    limits
        .iter()
        .copied()
        .filter(move |limit| pin.map_or(true, |direction| direction.permits(*limit)))
}

/// Walks one ray, pushing quiet moves and at most one capture.
///
/// Squares that leave a check unresolved are skipped without ending the ray,
/// unless an opponent piece stands on them.
pub fn walk_limit(flags: &DerivedFlags, from: Square, limit: DirectionalLimit, out: &mut Vec<ChessMove>) {
    let mut square = from;
    for _ in 0..limit.max_steps {
        let Some(next) = offset_square(square, limit.dx, limit.dy) else {
            break;
        };
        square = next;
        let bit = square_bit(square);

        if flags.player & bit != 0 {
            break;
        }
        let is_capture = flags.opponent & bit != 0;
        if flags.does_not_block_check & bit != 0 {
            if is_capture {
                break;
            }
            continue;
        }

        out.push(ChessMove::new(from, square));
        if is_capture {
            break;
        }
    }
}

#[inline]
pub fn walk_limits(flags: &DerivedFlags, from: Square, limits: &[DirectionalLimit], out: &mut Vec<ChessMove>) {
    for limit in unpinned_limits(flags, from, limits) {
        walk_limit(flags, from, limit, out);
    }
}
