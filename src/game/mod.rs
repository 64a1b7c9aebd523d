//! Core Connect-X game logic: board representation, win detection, player
//! types, and the reversible game state machine.

mod board;
mod player;
mod state;
pub mod win;

pub use board::{Board, Cell};
pub use player::Player;
pub use state::{GameOutcome, GameState, MoveGuard, MoveRecord};
pub use win::{find_winner, find_winning_run, Orientation, WinningRun};
