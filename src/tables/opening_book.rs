//! Opening book built from tab-separated lines of named move sequences.
//!
//! Every position reached along a line is indexed by its FEN, so a book hit
//! needs no search. A reply's weight is the number of lines (or the summed
//! `weight` column) passing through it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use rand::Rng;

use crate::game_state::chess_rules::OPENING_BOOK_MOVE_LIMIT;
use crate::game_state::{chess_types::ChessMove, game_state::GameState};
use crate::move_generation::legal_move_generator::GeneratedMove;
use crate::utils::long_algebraic::long_algebraic_to_generated_move;

#[derive(Debug, Clone)]
pub struct BookMove {
    pub generated: GeneratedMove,
    pub weight: u32,
    /// Name of the first line that reached this reply.
    pub line_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_fen: HashMap<String, Vec<BookMove>>,
}

impl OpeningBook {
    /// Loads `tables/openings.tsv` when present, otherwise the embedded table.
    pub fn load_default() -> Self {
        let path = "tables/openings.tsv";
        if Path::new(path).exists() {
            match Self::from_tsv_path(path) {
                Ok(book) => return book,
                Err(err) => info!("ignoring opening book at {path}: {err}"),
            }
        }

        Self::from_tsv_str(include_str!("data/opening_book_minimal.tsv")).unwrap_or_default()
    }

    pub fn from_tsv_path(path: &str) -> Result<Self, String> {
        let data = fs::read_to_string(path).map_err(|e| format!("failed reading {path}: {e}"))?;
        Self::from_tsv_str(&data)
    }

    pub fn from_tsv_str(tsv: &str) -> Result<Self, String> {
        let mut lines = tsv.lines().filter(|line| !line.trim().is_empty());
        let header = lines.next().ok_or("opening TSV is empty")?;

        let mut name_idx = None;
        let mut sequence_idx = None;
        let mut weight_idx = None;
        for (i, column) in header.split('\t').enumerate() {
            match column.trim().to_ascii_lowercase().as_str() {
                "name" => name_idx = Some(i),
                "uci" | "moves" => sequence_idx = sequence_idx.or(Some(i)),
                "weight" | "count" => weight_idx = Some(i),
                _ => {}
            }
        }
        let sequence_idx = sequence_idx.ok_or("opening TSV must contain a 'uci' or 'moves' column")?;

        let mut by_fen: HashMap<String, Vec<BookMove>> = HashMap::new();
        for line in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let sequence = fields
                .get(sequence_idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| format!("missing move sequence in opening row '{line}'"))?;
            let line_name = name_idx
                .and_then(|idx| fields.get(idx))
                .map(|s| s.trim().to_owned())
                .unwrap_or_default();
            let row_weight = weight_idx
                .and_then(|idx| fields.get(idx))
                .and_then(|w| w.trim().parse::<u32>().ok())
                .unwrap_or(1)
                .max(1);

            let mut state = GameState::new_game();
            for token in sequence.split_whitespace() {
                let generated = long_algebraic_to_generated_move(token, &state)
                    .map_err(|e| format!("bad move '{token}' in opening row '{line}': {e}"))?;

                let replies = by_fen.entry(state.get_fen()).or_default();
                match replies.iter_mut().find(|m| m.generated.chess_move == generated.chess_move) {
                    Some(existing) => existing.weight = existing.weight.saturating_add(row_weight),
                    None => replies.push(BookMove {
                        generated: generated.clone(),
                        weight: row_weight,
                        line_name: line_name.clone(),
                    }),
                }

                state = generated.game_after_move;
            }
        }

        Ok(Self { by_fen })
    }

    pub fn len(&self) -> usize {
        self.by_fen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fen.is_empty()
    }

    pub fn moves_for(&self, game_state: &GameState) -> Option<&[BookMove]> {
        self.by_fen.get(&game_state.get_fen()).map(|v| v.as_slice())
    }

    /// Weighted random reply, only while the game is young enough for the book.
    pub fn choose_weighted_move<R: Rng + ?Sized>(&self, game_state: &GameState, rng: &mut R) -> Option<&BookMove> {
        if game_state.fullmove_number >= OPENING_BOOK_MOVE_LIMIT {
            return None;
        }

        let moves = self.moves_for(game_state)?;
        let total_weight: u64 = moves.iter().map(|m| u64::from(m.weight)).sum();
        if total_weight == 0 {
            return moves.first();
        }

        let mut pick = rng.random_range(0..total_weight);
        for m in moves {
            let w = u64::from(m.weight);
            if pick < w {
                debug!("book reply from {} ({} of {total_weight})", m.line_name, m.weight);
                return Some(m);
            }
            pick -= w;
        }

        moves.first()
    }

    pub fn contains_move(&self, game_state: &GameState, chess_move: ChessMove) -> bool {
        self.moves_for(game_state)
            .is_some_and(|moves| moves.iter().any(|m| m.generated.chess_move == chess_move))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::utils::long_algebraic::move_to_long_algebraic;

    #[test]
    fn opening_book_parses_and_indexes_start_position() {
        let tsv = "eco\tname\tuci\tweight\nC20\tKing Pawn\te2e4 e7e5\t5\nD00\tQueen Pawn\td2d4 d7d5\t3\n";
        let book = OpeningBook::from_tsv_str(tsv).expect("book should parse");
        let start = GameState::new_game();
        let row = book.moves_for(&start).expect("start position should be indexed");
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].weight, 5);
        assert_eq!(row[0].line_name, "King Pawn");
        assert_eq!(book.len(), 3);
    }

    #[test]
    fn shared_prefixes_accumulate_weight() {
        let tsv = "name\tuci\nItalian\te2e4 e7e5 g1f3 b8c6 f1c4\nRuy Lopez\te2e4 e7e5 g1f3 b8c6 f1b5\n";
        let book = OpeningBook::from_tsv_str(tsv).expect("book should parse");
        let start = GameState::new_game();
        let row = book.moves_for(&start).expect("start position should be indexed");
        assert_eq!(row.len(), 1);
        assert_eq!(row[0].weight, 2);
    }

    #[test]
    fn choose_weighted_move_is_legal_lan() {
        let tsv = "uci\tweight\ne2e4 e7e5\t4\nd2d4 d7d5\t1\n";
        let book = OpeningBook::from_tsv_str(tsv).expect("book should parse");
        let start = GameState::new_game();
        let mut rng = StdRng::seed_from_u64(7);
        let mv = book.choose_weighted_move(&start, &mut rng).expect("book should choose");
        let lan = move_to_long_algebraic(mv.generated.chess_move).expect("lan conversion");
        assert!(lan == "e2e4" || lan == "d2d4");
    }

    #[test]
    fn book_is_ignored_from_move_four() {
        let book = OpeningBook::load_default();
        let mut late = GameState::new_game();
        late.fullmove_number = 4;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(book.choose_weighted_move(&late, &mut rng).is_none());
    }

    #[test]
    fn embedded_book_answers_common_openings() {
        let book = OpeningBook::load_default();
        assert!(!book.is_empty());
        let after_e4 = GameState::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .expect("test FEN should parse");
        assert!(book.contains_move(&after_e4, ChessMove::new(50, 34)));
        assert!(book.contains_move(&after_e4, ChessMove::new(52, 36)));
    }

    #[test]
    fn illegal_rows_are_rejected() {
        assert!(OpeningBook::from_tsv_str("uci\ne2e5\n").is_err());
        assert!(OpeningBook::from_tsv_str("eco\tname\nA00\tNothing\n").is_err());
        assert!(OpeningBook::from_tsv_str("").is_err());
    }
}
