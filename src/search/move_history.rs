//! Append-only record of the moves played to reach a position.
//!
//! Repetition is only detected as a short oscillation: the last four moves
//! equal the four before them. Whole-game position repetition is not tracked.

use crate::game_state::chess_types::ChessMove;

const OSCILLATION_WINDOW: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<ChessMove>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_moves(moves: Vec<ChessMove>) -> Self {
        Self { moves }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[ChessMove] {
        &self.moves
    }

    pub fn push(&mut self, chess_move: ChessMove) {
        self.moves.push(chess_move);
    }

    /// Undoes the latest [`push`](Self::push) while walking a search line.
    pub(crate) fn pop(&mut self) -> Option<ChessMove> {
        self.moves.pop()
    }

    pub fn is_oscillating(&self) -> bool {
        let len = self.moves.len();
        len >= 2 * OSCILLATION_WINDOW
            && self.moves[len - OSCILLATION_WINDOW..] == self.moves[len - 2 * OSCILLATION_WINDOW..len - OSCILLATION_WINDOW]
    }

    /// Whether recording `next` would make the history oscillate.
    pub fn would_oscillate(&self, next: ChessMove) -> bool {
        let len = self.moves.len() + 1;
        if len < 2 * OSCILLATION_WINDOW {
            return false;
        }
        let at = |index: usize| {
            if index == self.moves.len() {
                next
            } else {
                self.moves[index]
            }
        };
        (0..OSCILLATION_WINDOW).all(|back| at(len - 1 - back) == at(len - 1 - back - OSCILLATION_WINDOW))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuffle() -> [ChessMove; 4] {
        [
            ChessMove::new(6, 21),
            ChessMove::new(62, 45),
            ChessMove::new(21, 6),
            ChessMove::new(45, 62),
        ]
    }

    #[test]
    fn two_identical_cycles_oscillate() {
        let mut history = MoveHistory::new();
        for chess_move in shuffle().iter().chain(shuffle().iter()) {
            assert!(!history.is_oscillating());
            history.push(*chess_move);
        }
        assert!(history.is_oscillating());
    }

    #[test]
    fn would_oscillate_matches_pushing() {
        let mut history = MoveHistory::new();
        for chess_move in shuffle().iter().chain(shuffle()[..3].iter()) {
            history.push(*chess_move);
        }
        assert!(history.would_oscillate(ChessMove::new(45, 62)));
        assert!(!history.would_oscillate(ChessMove::new(45, 63)));

        let mut pushed = history.clone();
        pushed.push(ChessMove::new(45, 62));
        assert!(pushed.is_oscillating());
        assert_eq!(pushed.pop(), Some(ChessMove::new(45, 62)));
        assert_eq!(pushed, history);
    }

    #[test]
    fn short_history_never_oscillates() {
        let history = MoveHistory::from_moves(shuffle().to_vec());
        assert!(!history.is_oscillating());
        assert!(!history.would_oscillate(ChessMove::new(6, 21)));
        assert_eq!(history.len(), 4);
    }
}
