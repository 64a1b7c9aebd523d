//! Terminal UI: a game screen where each seat is a human or the minimax
//! player, with automated moves computed off the render thread.

mod app;
mod game_view;

pub use app::{App, SeatKind};
