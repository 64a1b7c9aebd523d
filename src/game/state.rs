use std::fmt;
use std::ops::{Deref, DerefMut};

use super::win::{find_winner, find_winning_run, WinningRun};
use super::{Board, Cell, Player};
use crate::error::{BoardError, MoveError, ReplayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// One recorded move. The mover is stored explicitly so undo never has to
/// guess it from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub column: usize,
    pub row: usize,
    pub player: Player,
}

/// Canonical game state: board, turn, win length and move history.
///
/// All mutation goes through [`insert`](Self::insert),
/// [`undo_last_move`](Self::undo_last_move) and
/// [`reset_game`](Self::reset_game). `Clone` (and [`copy`](Self::copy)) is a
/// deep copy, which is what search routines explore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    win_length: usize,
    current_player: Player,
    outcome: Option<GameOutcome>,
    history: Vec<MoveRecord>,
}

impl GameState {
    /// Create an empty game. Every dimension must be at least 1.
    pub fn new(cols: usize, rows: usize, win_length: usize) -> Result<Self, BoardError> {
        if win_length == 0 {
            return Err(BoardError::InvalidDimension {
                name: "win_length",
                value: win_length,
            });
        }
        Ok(GameState {
            board: Board::new(cols, rows)?,
            win_length,
            current_player: Player::FIRST,
            outcome: None,
            history: Vec::new(),
        })
    }

    /// Rebuild a game by replaying columns with the same rules as `insert`.
    ///
    /// Stops at the first illegal column and reports its position; no
    /// partially replayed state is returned.
    pub fn from_history(
        moves: &[usize],
        cols: usize,
        rows: usize,
        win_length: usize,
    ) -> Result<Self, ReplayError> {
        let mut state = GameState::new(cols, rows, win_length)?;
        for (index, &column) in moves.iter().enumerate() {
            state
                .insert(column)
                .map_err(|source| ReplayError::IllegalMove {
                    index,
                    column,
                    source,
                })?;
        }
        Ok(state)
    }

    /// Start over with the same dimensions.
    pub fn reset_game(&mut self) {
        self.board.clear();
        self.current_player = Player::FIRST;
        self.outcome = None;
        self.history.clear();
    }

    /// Independent deep copy for exploring hypothetical moves.
    pub fn copy(&self) -> GameState {
        self.clone()
    }

    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Every move played so far, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Played columns in order, suitable for [`from_history`](Self::from_history).
    pub fn move_columns(&self) -> Vec<usize> {
        self.history.iter().map(|m| m.column).collect()
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Colour of the winning run on the board, or `Cell::Empty`.
    pub fn check_for_win(&self) -> Cell {
        find_winner(&self.board, self.win_length)
    }

    /// The winning run itself, for highlighting.
    pub fn winning_run(&self) -> Option<WinningRun> {
        find_winning_run(&self.board, self.win_length)
    }

    pub fn winning_player(&self) -> Option<Player> {
        match self.outcome {
            Some(GameOutcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    fn legality(&self, column: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }
        if column >= self.board.cols() {
            return Err(MoveError::InvalidColumn {
                column,
                cols: self.board.cols(),
            });
        }
        if self.board.is_column_full(column) {
            return Err(MoveError::ColumnFull { column });
        }
        Ok(())
    }

    /// Whether `insert(column)` would succeed. Never mutates.
    pub fn check_legal(&self, column: usize) -> bool {
        self.legality(column).is_ok()
    }

    /// Get list of legal columns in ascending order (empty once the game is over)
    pub fn valid_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..self.board.cols())
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Drop the current player's disc into `column`, returning the row it
    /// landed on.
    ///
    /// A winning move ends the game and leaves the turn with the winner; any
    /// other move passes the turn, and filling the last cell ends the game
    /// as a draw.
    pub fn insert(&mut self, column: usize) -> Result<usize, MoveError> {
        self.legality(column)?;

        let player = self.current_player;
        let row = self.board.drop_piece(column, player.to_cell())?;
        self.history.push(MoveRecord {
            column,
            row,
            player,
        });

        if find_winner(&self.board, self.win_length) != Cell::Empty {
            self.outcome = Some(GameOutcome::Winner(player));
            return Ok(row);
        }
        if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }
        self.current_player = player.other();
        Ok(row)
    }

    /// Revert the most recent move, handing the turn back to its mover.
    pub fn undo_last_move(&mut self) -> Result<MoveRecord, MoveError> {
        let record = self.history.pop().ok_or(MoveError::EmptyHistory)?;
        self.board.lift_piece(record.column);
        self.current_player = record.player;
        self.outcome = None;
        Ok(record)
    }

    /// Apply a move that is reverted when the returned guard is dropped.
    ///
    /// The guard dereferences to the state, so a search can recurse through
    /// it; every exit path (including `?` and early returns) restores the
    /// position.
    pub fn try_move(&mut self, column: usize) -> Result<MoveGuard<'_>, MoveError> {
        self.insert(column)?;
        Ok(MoveGuard { state: self })
    }

    /// Text grid: a header of column indices, then rows top to bottom.
    pub fn board_repr(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = (0..self.cols()).map(|c| c.to_string()).collect();
        writeln!(f, "{}", header.join("  "))?;
        for row in 0..self.rows() {
            let cells: Vec<String> = (0..self.cols())
                .map(|col| self.board.get(row, col).glyph().to_string())
                .collect();
            writeln!(f, "{}", cells.join("  "))?;
        }
        Ok(())
    }
}

/// A move applied by [`GameState::try_move`]; undone on drop.
pub struct MoveGuard<'a> {
    state: &'a mut GameState,
}

impl Deref for MoveGuard<'_> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.state
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.state
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        // The guarded move is always the newest history entry here.
        let _ = self.state.undo_last_move();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new(7, 6, 4).unwrap();
        assert_eq!(state.current_player(), Player::Black);
        assert!(!state.is_terminal());
        assert_eq!(state.valid_moves(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            GameState::new(4, 4, 0),
            Err(BoardError::InvalidDimension {
                name: "win_length",
                value: 0
            })
        );
        assert!(GameState::new(0, 4, 3).is_err());
        assert!(GameState::new(4, 0, 3).is_err());
    }

    #[test]
    fn test_insert() {
        let mut state = GameState::new(7, 6, 4).unwrap();
        let row = state.insert(3).unwrap();

        assert_eq!(row, 5);
        assert_eq!(state.current_player(), Player::White);
        assert_eq!(state.board().get(5, 3), Cell::Black);
        assert_eq!(
            state.history(),
            &[MoveRecord {
                column: 3,
                row: 5,
                player: Player::Black
            }]
        );
    }

    #[test]
    fn test_insert_errors() {
        let mut state = GameState::new(2, 1, 2).unwrap();
        assert_eq!(
            state.insert(2),
            Err(MoveError::InvalidColumn { column: 2, cols: 2 })
        );
        state.insert(0).unwrap();
        assert_eq!(state.insert(0), Err(MoveError::ColumnFull { column: 0 }));
        assert!(!state.check_legal(0));
        assert!(state.check_legal(1));
        // Failed inserts leave no trace
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.current_player(), Player::White);
    }

    #[test]
    fn test_win_detection_keeps_turn_with_winner() {
        let mut state = GameState::new(7, 6, 4).unwrap();

        // Black wins with horizontal line
        for col in 0..4 {
            state.insert(col).unwrap(); // Black
            if col < 3 {
                state.insert(col).unwrap(); // White (different row)
            }
        }

        assert!(state.is_terminal());
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Player::Black)));
        assert_eq!(state.winning_player(), Some(Player::Black));
        assert_eq!(state.check_for_win(), Cell::Black);
        assert_eq!(state.current_player(), Player::Black);
        assert!(state.valid_moves().is_empty());
        assert_eq!(state.insert(5), Err(MoveError::GameAlreadyOver));
    }

    #[test]
    fn test_draw_when_board_fills() {
        // 2x2 with win length 3 can never be won
        let state = GameState::from_history(&[0, 0, 1, 1], 2, 2, 3).unwrap();
        assert_eq!(state.outcome(), Some(GameOutcome::Draw));
        assert_eq!(state.winning_player(), None);
        assert_eq!(state.check_for_win(), Cell::Empty);
        assert!(state.valid_moves().is_empty());
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut state = GameState::new(4, 4, 3).unwrap();
        state.insert(1).unwrap();
        let before = state.copy();

        state.insert(2).unwrap();
        let undone = state.undo_last_move().unwrap();

        assert_eq!(undone.column, 2);
        assert_eq!(undone.player, Player::White);
        assert_eq!(state, before);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut state = GameState::new(4, 4, 3).unwrap();
        assert_eq!(state.undo_last_move(), Err(MoveError::EmptyHistory));
        assert_eq!(state, GameState::new(4, 4, 3).unwrap());
    }

    #[test]
    fn test_undo_reopens_finished_game() {
        let mut state = GameState::from_history(&[0, 1, 0, 1, 0], 4, 4, 3).unwrap();
        assert!(state.is_terminal());

        state.undo_last_move().unwrap();
        assert!(!state.is_terminal());
        assert_eq!(state.current_player(), Player::Black);
        assert_eq!(state.valid_moves(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_undo_after_column_refilled() {
        // Empty a column completely and refill it in the opposite colour order;
        // undo must follow the history, not the colours on the board.
        let mut state = GameState::new(3, 3, 3).unwrap();
        state.insert(0).unwrap(); // Black
        state.insert(0).unwrap(); // White
        state.undo_last_move().unwrap();
        state.undo_last_move().unwrap();
        state.insert(1).unwrap(); // Black
        state.insert(0).unwrap(); // White at the bottom of column 0

        let record = state.undo_last_move().unwrap();
        assert_eq!(record.player, Player::White);
        assert_eq!(state.current_player(), Player::White);
        assert_eq!(state.board().get(2, 0), Cell::Empty);
    }

    #[test]
    fn test_move_guard_reverts_on_drop() {
        let mut state = GameState::new(4, 4, 3).unwrap();
        let before = state.copy();
        {
            let mut guard = state.try_move(2).unwrap();
            assert_eq!(guard.board().get(3, 2), Cell::Black);
            let nested = guard.try_move(2).unwrap();
            assert_eq!(nested.history().len(), 2);
        }
        assert_eq!(state, before);
        assert!(state.try_move(9).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = GameState::new(4, 4, 3).unwrap();
        original.insert(0).unwrap();
        let snapshot = original.clone();

        let mut copy = original.copy();
        copy.insert(1).unwrap();
        copy.insert(1).unwrap();
        copy.reset_game();

        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_from_history_reports_first_illegal_move() {
        let err = GameState::from_history(&[0, 0, 0, 7, 0], 4, 3, 4).unwrap_err();
        assert_eq!(
            err,
            ReplayError::IllegalMove {
                index: 3,
                column: 7,
                source: MoveError::InvalidColumn { column: 7, cols: 4 }
            }
        );

        let err = GameState::from_history(&[1, 1, 1, 1], 4, 3, 4).unwrap_err();
        assert!(matches!(err, ReplayError::IllegalMove { index: 3, .. }));
    }

    #[test]
    fn test_from_history_roundtrip() {
        let state = GameState::from_history(&[3, 2, 3, 4, 1], 7, 6, 4).unwrap();
        assert_eq!(state.move_columns(), vec![3, 2, 3, 4, 1]);
        let rebuilt = GameState::from_history(&state.move_columns(), 7, 6, 4).unwrap();
        assert_eq!(rebuilt, state);
    }

    #[test]
    fn test_reset_game() {
        let mut state = GameState::from_history(&[0, 1, 0, 1, 0], 4, 4, 3).unwrap();
        state.reset_game();
        assert_eq!(state, GameState::new(4, 4, 3).unwrap());
    }

    #[test]
    fn test_board_repr() {
        let state = GameState::from_history(&[0, 2], 3, 2, 2).unwrap();
        assert_eq!(state.board_repr(), "0  1  2\n.  .  .\nB  .  W\n");
    }

    fn arb_game() -> impl Strategy<Value = (usize, usize, usize, Vec<usize>)> {
        (1usize..=6, 1usize..=5, 1usize..=5).prop_flat_map(|(cols, rows, win)| {
            (
                Just(cols),
                Just(rows),
                Just(win),
                prop::collection::vec(0..cols, 0..cols * rows),
            )
        })
    }

    /// Play the legal prefix of `moves`, skipping columns that are refused.
    fn play_legal(cols: usize, rows: usize, win: usize, moves: &[usize]) -> GameState {
        let mut state = GameState::new(cols, rows, win).unwrap();
        for &col in moves {
            let _ = state.insert(col);
        }
        state
    }

    proptest! {
        #[test]
        fn prop_undo_inverts_insert((cols, rows, win, moves) in arb_game(), col in 0usize..6) {
            let mut state = play_legal(cols, rows, win, &moves);
            let before = state.clone();
            if state.insert(col).is_ok() {
                state.undo_last_move().unwrap();
            }
            prop_assert_eq!(state, before);
        }

        #[test]
        fn prop_valid_moves_non_increasing((cols, rows, win, moves) in arb_game(), col in 0usize..6) {
            let mut state = play_legal(cols, rows, win, &moves);
            let before = state.valid_moves().len();
            if state.insert(col).is_ok() && !state.is_terminal() {
                let after = state.valid_moves().len();
                prop_assert!(after <= before);
                prop_assert_eq!(after < before, state.board().is_column_full(col));
            }
        }

        #[test]
        fn prop_history_replays_board((cols, rows, win, moves) in arb_game()) {
            let state = play_legal(cols, rows, win, &moves);
            prop_assert_eq!(state.history().len(), state.board().disc_count());
            let rebuilt = GameState::from_history(&state.move_columns(), cols, rows, win).unwrap();
            prop_assert_eq!(rebuilt, state);
        }

        #[test]
        fn prop_copy_isolated((cols, rows, win, moves) in arb_game(), extra in prop::collection::vec(0usize..6, 1..8)) {
            let original = play_legal(cols, rows, win, &moves);
            let snapshot = original.clone();
            let mut copy = original.copy();
            for col in extra {
                let _ = copy.insert(col);
            }
            let _ = copy.undo_last_move();
            prop_assert_eq!(original, snapshot);
        }

        #[test]
        fn prop_check_legal_matches_valid_moves((cols, rows, win, moves) in arb_game()) {
            let state = play_legal(cols, rows, win, &moves);
            let legal: Vec<usize> = (0..cols + 2).filter(|&c| state.check_legal(c)).collect();
            prop_assert_eq!(legal, state.valid_moves());
        }
    }
}
