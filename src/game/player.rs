use serde::{Deserialize, Serialize};

use super::board::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The player who moves first in every game.
    pub const FIRST: Player = Player::Black;

    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }

    /// Scores are always reported from Black's point of view, so Black
    /// maximizes and White minimizes.
    pub fn is_maximizing(self) -> bool {
        self == Player::Black
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Black => "BLACK",
            Player::White => "WHITE",
        }
    }

    /// Seat index (0 for Black, 1 for White).
    pub fn index(self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::Black.other(), Player::White);
        assert_eq!(Player::White.other(), Player::Black);
    }

    #[test]
    fn test_player_name() {
        assert_eq!(Player::Black.name(), "BLACK");
        assert_eq!(Player::White.name(), "WHITE");
    }

    #[test]
    fn test_cell_and_side() {
        assert_eq!(Player::Black.to_cell(), Cell::Black);
        assert!(Player::FIRST.is_maximizing());
        assert!(!Player::White.is_maximizing());
        assert_eq!(Player::White.index(), 1);
    }
}
