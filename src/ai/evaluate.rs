use crate::game::{Cell, GameOutcome, GameState, Player};

/// Magnitude of a won position before any depth adjustment.
pub const WIN_SCORE: i64 = 1_000_000;
/// Score of a drawn (full, unwon) position.
pub const DRAW_SCORE: i64 = 0;

/// Trait for evaluating a position from a player's perspective.
pub trait Heuristic: Send {
    /// Called once before a search on `state` begins, so per-board data can
    /// be rebuilt when the board shape changes.
    fn prepare(&mut self, _state: &GameState) {}

    /// Score `state` for `maximizer`: positive is good for `maximizer`.
    fn evaluate(&self, state: &GameState, maximizer: Player) -> i64;

    /// Score magnitude of a won position; must exceed any non-terminal score.
    fn win_score(&self) -> i64 {
        WIN_SCORE
    }

    fn clone_box(&self) -> Box<dyn Heuristic>;
}

/// Per-cell weights: the number of `win_length` windows (in any of the four
/// directions) that pass through each cell.
///
/// Center cells sit on more windows than edge cells, and the table is
/// symmetric left-right and top-bottom. On a 7x6 board with win length 4 it
/// reproduces the classic connect-four evaluation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    cols: usize,
    rows: usize,
    win_length: usize,
    // Column-major, like the board.
    weights: Vec<i64>,
}

impl WeightTable {
    pub fn new(cols: usize, rows: usize, win_length: usize) -> Self {
        let mut weights = vec![0i64; cols * rows];
        let directions: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

        for row in 0..rows as isize {
            for col in 0..cols as isize {
                for &(dr, dc) in &directions {
                    let end_row = row + dr * (win_length as isize - 1);
                    let end_col = col + dc * (win_length as isize - 1);
                    if end_row < 0 || end_row >= rows as isize || end_col >= cols as isize {
                        continue;
                    }
                    for i in 0..win_length as isize {
                        let r = (row + dr * i) as usize;
                        let c = (col + dc * i) as usize;
                        weights[c * rows + r] += 1;
                    }
                }
            }
        }

        WeightTable {
            cols,
            rows,
            win_length,
            weights,
        }
    }

    pub fn fits(&self, state: &GameState) -> bool {
        self.cols == state.cols() && self.rows == state.rows() && self.win_length == state.win_length()
    }

    /// Weight of the cell at (row, col); row 0 is the top.
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.weights[col * self.rows + row]
    }

    pub fn total(&self) -> i64 {
        self.weights.iter().sum()
    }
}

/// Weighted positional sum: own discs add their cell weight, opponent discs
/// subtract it.
#[derive(Debug, Clone, Default)]
pub struct PositionalHeuristic {
    table: Option<WeightTable>,
}

impl PositionalHeuristic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_state(state: &GameState) -> Self {
        PositionalHeuristic {
            table: Some(WeightTable::new(state.cols(), state.rows(), state.win_length())),
        }
    }

    pub fn table(&self) -> Option<&WeightTable> {
        self.table.as_ref()
    }

    fn positional(table: &WeightTable, state: &GameState, maximizer: Player) -> i64 {
        let own = maximizer.to_cell();
        let board = state.board();
        let mut score = 0;
        for col in 0..board.cols() {
            for (row, &cell) in board.column(col).iter().enumerate() {
                if cell == Cell::Empty {
                    continue;
                }
                let weight = table.get(row, col);
                if cell == own {
                    score += weight;
                } else {
                    score -= weight;
                }
            }
        }
        score
    }
}

impl Heuristic for PositionalHeuristic {
    fn prepare(&mut self, state: &GameState) {
        if !self.table.as_ref().is_some_and(|t| t.fits(state)) {
            self.table = Some(WeightTable::new(state.cols(), state.rows(), state.win_length()));
        }
    }

    fn evaluate(&self, state: &GameState, maximizer: Player) -> i64 {
        match state.outcome() {
            Some(GameOutcome::Winner(winner)) if winner == maximizer => self.win_score(),
            Some(GameOutcome::Winner(_)) => -self.win_score(),
            Some(GameOutcome::Draw) => DRAW_SCORE,
            None => match &self.table {
                Some(table) if table.fits(state) => Self::positional(table, state, maximizer),
                _ => {
                    let table = WeightTable::new(state.cols(), state.rows(), state.win_length());
                    Self::positional(&table, state, maximizer)
                }
            },
        }
    }

    fn win_score(&self) -> i64 {
        // Keep terminal scores above the largest possible positional sum.
        let bound = self.table.as_ref().map_or(0, |t| t.total() + 1);
        WIN_SCORE.max(bound)
    }

    fn clone_box(&self) -> Box<dyn Heuristic> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_table_matches_classic_board() {
        let table = WeightTable::new(7, 6, 4);
        let expected = [
            [3, 4, 5, 7, 5, 4, 3],
            [4, 6, 8, 10, 8, 6, 4],
            [5, 8, 11, 13, 11, 8, 5],
            [5, 8, 11, 13, 11, 8, 5],
            [4, 6, 8, 10, 8, 6, 4],
            [3, 4, 5, 7, 5, 4, 3],
        ];
        for (row, weights) in expected.iter().enumerate() {
            for (col, &w) in weights.iter().enumerate() {
                assert_eq!(table.get(row, col), w, "weight at ({row}, {col})");
            }
        }
    }

    #[test]
    fn weight_table_is_symmetric_on_other_shapes() {
        for &(cols, rows, win) in &[(4, 4, 3), (5, 3, 3), (1, 4, 3), (6, 5, 2)] {
            let table = WeightTable::new(cols, rows, win);
            for row in 0..rows {
                for col in 0..cols {
                    assert_eq!(table.get(row, col), table.get(row, cols - 1 - col));
                    assert_eq!(table.get(row, col), table.get(rows - 1 - row, col));
                }
            }
        }
    }

    #[test]
    fn weight_table_prefers_center() {
        let table = WeightTable::new(5, 5, 3);
        assert!(table.get(2, 2) > table.get(0, 0));
        assert!(table.get(4, 2) > table.get(4, 0));
    }

    #[test]
    fn unreachable_win_length_gives_zero_weights() {
        let table = WeightTable::new(3, 3, 5);
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn heuristic_empty_board_is_zero() {
        let state = GameState::new(7, 6, 4).unwrap();
        let h = PositionalHeuristic::for_state(&state);
        assert_eq!(h.evaluate(&state, Player::Black), 0);
        assert_eq!(h.evaluate(&state, Player::White), 0);
    }

    #[test]
    fn heuristic_center_preference() {
        let center = GameState::from_history(&[3], 7, 6, 4).unwrap();
        let edge = GameState::from_history(&[0], 7, 6, 4).unwrap();
        let h = PositionalHeuristic::for_state(&center);

        let score_center = h.evaluate(&center, Player::Black);
        let score_edge = h.evaluate(&edge, Player::Black);
        assert_eq!(score_center, 7);
        assert_eq!(score_edge, 3);
        assert_eq!(h.evaluate(&center, Player::White), -7);
    }

    #[test]
    fn heuristic_terminal_scores() {
        let won = GameState::from_history(&[0, 1, 0, 1, 0], 4, 4, 3).unwrap();
        let mut h = PositionalHeuristic::new();
        h.prepare(&won);
        assert_eq!(h.evaluate(&won, Player::Black), h.win_score());
        assert_eq!(h.evaluate(&won, Player::White), -h.win_score());

        let drawn = GameState::from_history(&[0, 0, 1, 1], 2, 2, 3).unwrap();
        assert_eq!(h.evaluate(&drawn, Player::Black), DRAW_SCORE);
    }

    #[test]
    fn win_score_dominates_positional_sum() {
        let state = GameState::new(7, 6, 4).unwrap();
        let h = PositionalHeuristic::for_state(&state);
        let table = h.table().unwrap();
        assert!(h.win_score() > table.total());
    }

    #[test]
    fn mismatched_table_is_rebuilt() {
        let small = GameState::from_history(&[1], 3, 3, 3).unwrap();
        let big = GameState::new(7, 6, 4).unwrap();
        let mut h = PositionalHeuristic::for_state(&big);

        // Falls back to a fresh table without preparing
        let expected = WeightTable::new(3, 3, 3).get(2, 1);
        assert_eq!(h.evaluate(&small, Player::Black), expected);

        h.prepare(&small);
        assert!(h.table().unwrap().fits(&small));
    }
}
