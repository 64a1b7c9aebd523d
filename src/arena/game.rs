use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::Agent;
use crate::config::BoardConfig;
use crate::error::ArenaError;
use crate::game::{GameOutcome, GameState, Player};

/// How a single arena game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Winner(Player),
    Draw,
    /// The move limit was reached before the game finished.
    MoveLimit,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<Player> {
        match self {
            MatchOutcome::Winner(player) => Some(*player),
            MatchOutcome::Draw | MatchOutcome::MoveLimit => None,
        }
    }
}

/// Result of playing a single game between two agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub black: String,
    pub white: String,
    /// Columns played, replayable with `GameState::from_history`.
    pub moves: Vec<usize>,
    pub outcome: MatchOutcome,
    /// Total thinking time of each side, in seconds.
    pub black_secs: f64,
    pub white_secs: f64,
}

impl GameRecord {
    pub fn game_length(&self) -> usize {
        self.moves.len()
    }
}

/// Play one game, `black` moving first, until it ends or `move_limit` moves
/// have been played.
pub fn play_game(
    black: &mut dyn Agent,
    white: &mut dyn Agent,
    board: &BoardConfig,
    move_limit: usize,
) -> Result<GameRecord, ArenaError> {
    let mut state = GameState::new(board.cols, board.rows, board.win_length)?;
    let mut think = [Duration::ZERO; 2];

    while !state.is_terminal() && state.history().len() < move_limit {
        let player = state.current_player();
        let agent: &mut dyn Agent = match player {
            Player::Black => &mut *black,
            Player::White => &mut *white,
        };

        let timer = Instant::now();
        let column = agent
            .on_move_ready(None, &state)
            .map_err(|source| ArenaError::Agent {
                agent: agent.name().to_string(),
                source,
            })?;
        think[player.index()] += timer.elapsed();

        if let Err(source) = state.insert(column) {
            return Err(ArenaError::IllegalMove {
                agent: agent.name().to_string(),
                column,
                legal: state.valid_moves(),
                source,
            });
        }
        debug!(player = player.name(), column, "arena move");
    }

    let outcome = match state.outcome() {
        Some(GameOutcome::Winner(player)) => MatchOutcome::Winner(player),
        Some(GameOutcome::Draw) => MatchOutcome::Draw,
        None => MatchOutcome::MoveLimit,
    };

    let record = GameRecord {
        black: black.name().to_string(),
        white: white.name().to_string(),
        moves: state.move_columns(),
        outcome,
        black_secs: think[Player::Black.index()].as_secs_f64(),
        white_secs: think[Player::White.index()].as_secs_f64(),
    };
    info!(
        black = %record.black,
        white = %record.white,
        outcome = ?record.outcome,
        moves = record.game_length(),
        "game finished"
    );
    Ok(record)
}
