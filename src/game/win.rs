//! Whole-board win detection for arbitrary `cols x rows x win_length`.
//!
//! The board is cut into four families of straight lines (rows, columns,
//! positive diagonals, negative diagonals). Each line is run-length encoded
//! and the first run of one colour at least `win_length` long wins. Scan
//! order is fixed, so the reported run is deterministic.

use super::board::{Board, Cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Row,
    Column,
    /// Bottom-left to top-right (`/`).
    PositiveDiagonal,
    /// Top-left to bottom-right (`\`).
    NegativeDiagonal,
}

impl Orientation {
    /// (row delta, column delta) between consecutive cells of a line.
    fn step(self) -> (isize, isize) {
        match self {
            Orientation::Row => (0, 1),
            Orientation::Column => (1, 0),
            Orientation::PositiveDiagonal => (-1, 1),
            Orientation::NegativeDiagonal => (1, 1),
        }
    }
}

/// One maximal straight line across the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub orientation: Orientation,
    /// First cell as (row, col).
    pub start: (usize, usize),
}

impl Line {
    /// Positions along the line, stopping at the board edge.
    pub fn positions(self, cols: usize, rows: usize) -> impl Iterator<Item = (usize, usize)> {
        let (dr, dc) = self.orientation.step();
        let (mut r, mut c) = (self.start.0 as isize, self.start.1 as isize);
        std::iter::from_fn(move || {
            if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
                return None;
            }
            let pos = (r as usize, c as usize);
            r += dr;
            c += dc;
            Some(pos)
        })
    }
}

/// All lines of a `cols x rows` grid in scan order: rows, columns, positive
/// diagonals, negative diagonals.
pub fn lines(cols: usize, rows: usize) -> impl Iterator<Item = Line> {
    let row_lines = (0..rows).map(|r| Line {
        orientation: Orientation::Row,
        start: (r, 0),
    });
    let col_lines = (0..cols).map(|c| Line {
        orientation: Orientation::Column,
        start: (0, c),
    });
    // Positive diagonals share row + col; start from their bottom-left end.
    let pos_diagonals = (0..cols + rows - 1).map(move |sum| {
        let row = sum.min(rows - 1);
        Line {
            orientation: Orientation::PositiveDiagonal,
            start: (row, sum - row),
        }
    });
    // Negative diagonals share col - row; start from their top-left end.
    let neg_diagonals = (0..cols + rows - 1).map(move |k| {
        let start = if k < rows { (rows - 1 - k, 0) } else { (0, k - (rows - 1)) };
        Line {
            orientation: Orientation::NegativeDiagonal,
            start,
        }
    });
    row_lines
        .chain(col_lines)
        .chain(pos_diagonals)
        .chain(neg_diagonals)
}

/// A run of same-coloured discs at least `win_length` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningRun {
    pub cell: Cell,
    pub orientation: Orientation,
    /// Every cell of the run as (row, col), in line order.
    pub cells: Vec<(usize, usize)>,
}

impl WinningRun {
    fn new(cell: Cell, orientation: Orientation, start: (usize, usize), len: usize) -> Self {
        let (dr, dc) = orientation.step();
        let cells = (0..len as isize)
            .map(|i| {
                (
                    (start.0 as isize + dr * i) as usize,
                    (start.1 as isize + dc * i) as usize,
                )
            })
            .collect();
        WinningRun {
            cell,
            orientation,
            cells,
        }
    }
}

fn scan_line(board: &Board, line: Line, win_length: usize) -> Option<WinningRun> {
    let mut current = Cell::Empty;
    let mut run_start = line.start;
    let mut run_len = 0;

    for pos in line.positions(board.cols(), board.rows()) {
        let cell = board.get(pos.0, pos.1);
        if cell == current {
            run_len += 1;
            continue;
        }
        if current != Cell::Empty && run_len >= win_length {
            return Some(WinningRun::new(current, line.orientation, run_start, run_len));
        }
        current = cell;
        run_start = pos;
        run_len = 1;
    }

    (current != Cell::Empty && run_len >= win_length)
        .then(|| WinningRun::new(current, line.orientation, run_start, run_len))
}

/// First winning run on the board, if any.
pub fn find_winning_run(board: &Board, win_length: usize) -> Option<WinningRun> {
    lines(board.cols(), board.rows()).find_map(|line| scan_line(board, line, win_length))
}

/// Colour of the first winning run, or `Cell::Empty` when nobody has won.
pub fn find_winner(board: &Board, win_length: usize) -> Cell {
    find_winning_run(board, win_length)
        .map(|run| run.cell)
        .unwrap_or(Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(cols: usize, rows: usize, drops: &[(usize, Cell)]) -> Board {
        let mut board = Board::new(cols, rows).unwrap();
        for &(col, cell) in drops {
            board.drop_piece(col, cell).unwrap();
        }
        board
    }

    #[test]
    fn test_line_counts() {
        let all: Vec<Line> = lines(7, 6).collect();
        // 6 rows + 7 columns + 12 diagonals of each kind
        assert_eq!(all.len(), 6 + 7 + 12 + 12);

        let covered: usize = all
            .iter()
            .filter(|l| l.orientation == Orientation::PositiveDiagonal)
            .map(|l| l.positions(7, 6).count())
            .sum();
        assert_eq!(covered, 42, "positive diagonals must cover every cell once");

        let covered: usize = all
            .iter()
            .filter(|l| l.orientation == Orientation::NegativeDiagonal)
            .map(|l| l.positions(7, 6).count())
            .sum();
        assert_eq!(covered, 42, "negative diagonals must cover every cell once");
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        let board = Board::new(5, 3).unwrap();
        assert_eq!(find_winner(&board, 3), Cell::Empty);
    }

    #[test]
    fn test_horizontal_win() {
        let board = board_from(7, 6, &[(0, Cell::Black), (1, Cell::Black), (2, Cell::Black), (3, Cell::Black)]);
        let run = find_winning_run(&board, 4).unwrap();
        assert_eq!(run.cell, Cell::Black);
        assert_eq!(run.orientation, Orientation::Row);
        assert_eq!(run.cells, vec![(5, 0), (5, 1), (5, 2), (5, 3)]);
    }

    #[test]
    fn test_vertical_win() {
        let board = board_from(7, 6, &[(3, Cell::White); 4]);
        let run = find_winning_run(&board, 4).unwrap();
        assert_eq!(run.cell, Cell::White);
        assert_eq!(run.orientation, Orientation::Column);
    }

    #[test]
    fn test_positive_diagonal_win() {
        let board = board_from(
            7,
            6,
            &[
                (0, Cell::Black),
                (1, Cell::White),
                (1, Cell::Black),
                (2, Cell::White),
                (2, Cell::White),
                (2, Cell::Black),
                (3, Cell::White),
                (3, Cell::White),
                (3, Cell::White),
                (3, Cell::Black),
            ],
        );
        let run = find_winning_run(&board, 4).unwrap();
        assert_eq!(run.cell, Cell::Black);
        assert_eq!(run.orientation, Orientation::PositiveDiagonal);
        assert_eq!(run.cells, vec![(5, 0), (4, 1), (3, 2), (2, 3)]);
    }

    #[test]
    fn test_negative_diagonal_win() {
        let board = board_from(
            7,
            6,
            &[
                (6, Cell::Black),
                (5, Cell::White),
                (5, Cell::Black),
                (4, Cell::White),
                (4, Cell::White),
                (4, Cell::Black),
                (3, Cell::White),
                (3, Cell::White),
                (3, Cell::White),
                (3, Cell::Black),
            ],
        );
        let run = find_winning_run(&board, 4).unwrap();
        assert_eq!(run.cell, Cell::Black);
        assert_eq!(run.orientation, Orientation::NegativeDiagonal);
        assert_eq!(run.cells, vec![(2, 3), (3, 4), (4, 5), (5, 6)]);
    }

    #[test]
    fn test_run_one_short_is_not_a_win() {
        let board = board_from(7, 6, &[(0, Cell::Black), (1, Cell::Black), (2, Cell::Black)]);
        assert_eq!(find_winner(&board, 4), Cell::Empty);
        assert_eq!(find_winner(&board, 3), Cell::Black);
    }

    #[test]
    fn test_interrupted_run_is_not_a_win() {
        let board = board_from(
            5,
            1,
            &[(0, Cell::White), (1, Cell::White), (2, Cell::Black), (3, Cell::White), (4, Cell::White)],
        );
        assert_eq!(find_winner(&board, 3), Cell::Empty);
    }

    #[test]
    fn test_longer_run_reports_every_cell() {
        let board = board_from(5, 2, &[(0, Cell::White), (1, Cell::White), (2, Cell::White), (3, Cell::White)]);
        let run = find_winning_run(&board, 3).unwrap();
        assert_eq!(run.cells.len(), 4);
    }

    #[test]
    fn test_non_square_and_degenerate_boards() {
        // Single column, vertical only
        let board = board_from(1, 4, &[(0, Cell::Black), (0, Cell::Black)]);
        assert_eq!(find_winner(&board, 2), Cell::Black);

        // Wide single row
        let board = board_from(9, 1, &[(8, Cell::White)]);
        assert_eq!(find_winner(&board, 1), Cell::White);
        assert_eq!(find_winner(&board, 2), Cell::Empty);

        // Win length longer than any line can never be reached
        let mut board = Board::new(3, 3).unwrap();
        for col in 0..3 {
            for _ in 0..3 {
                board.drop_piece(col, Cell::Black).unwrap();
            }
        }
        assert_eq!(find_winner(&board, 4), Cell::Empty);
    }

    #[test]
    fn test_scan_order_prefers_rows() {
        // Black owns both the bottom row and column 0 on a 3x3 board.
        let board = board_from(
            3,
            3,
            &[(0, Cell::Black), (1, Cell::Black), (2, Cell::Black), (0, Cell::Black), (0, Cell::Black)],
        );
        let run = find_winning_run(&board, 3).unwrap();
        assert_eq!(run.orientation, Orientation::Row);
    }
}
