use crate::error::{BoardError, MoveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// Fixed single-character glyph used by the text representation.
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'B',
            Cell::White => 'W',
        }
    }
}

/// Column-major grid of cells with gravity-fill placement.
///
/// Dimensions are fixed at construction. Row 0 is the top row and
/// `rows - 1` the bottom one, so discs settle at the highest row index
/// still empty in their column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    // Number of discs in each column.
    heights: Vec<usize>,
}

impl Board {
    /// Create a new empty board
    pub fn new(cols: usize, rows: usize) -> Result<Self, BoardError> {
        if cols == 0 {
            return Err(BoardError::InvalidDimension {
                name: "cols",
                value: cols,
            });
        }
        if rows == 0 {
            return Err(BoardError::InvalidDimension {
                name: "rows",
                value: rows,
            });
        }
        Ok(Board {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
            heights: vec![0; cols],
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, row: usize, col: usize) -> usize {
        col * self.rows + row
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row `rows - 1` is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> &[Cell] {
        let start = col * self.rows;
        &self.cells[start..start + self.rows]
    }

    /// Number of discs currently stacked in a column.
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.cols {
            return true;
        }
        self.heights[col] == self.rows
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= self.cols {
            return Err(MoveError::InvalidColumn {
                column: col,
                cols: self.cols,
            });
        }
        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull { column: col });
        }

        let row = self.rows - 1 - self.heights[col];
        let idx = self.index(row, col);
        self.cells[idx] = cell;
        self.heights[col] += 1;
        Ok(row)
    }

    /// Remove the topmost disc of a column, returning its row and colour.
    pub fn lift_piece(&mut self, col: usize) -> Option<(usize, Cell)> {
        if col >= self.cols || self.heights[col] == 0 {
            return None;
        }
        let row = self.rows - self.heights[col];
        let idx = self.index(row, col);
        let cell = std::mem::replace(&mut self.cells[idx], Cell::Empty);
        self.heights[col] -= 1;
        Some((row, cell))
    }

    /// Empty every cell, keeping the dimensions.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
        self.heights.fill(0);
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Total number of discs on the board.
    pub fn disc_count(&self) -> usize {
        self.heights.iter().sum()
    }

    /// Number of cells still empty.
    pub fn empty_count(&self) -> usize {
        self.cols * self.rows - self.disc_count()
    }
}
