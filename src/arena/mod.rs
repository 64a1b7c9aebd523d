//! Automated matches between two agents: single games, alternating-colour
//! matches and their statistics.

mod game;
mod stats;

pub use game::{play_game, GameRecord, MatchOutcome};
pub use stats::{MatchStats, Seat};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::Agent;
use crate::config::BoardConfig;
use crate::error::ArenaError;
use crate::game::Player;

/// Match length and per-game move cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub games: usize,
    pub move_limit: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            games: 10,
            move_limit: 300,
        }
    }
}

/// Every game of a match plus the running tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub first: String,
    pub second: String,
    pub board: BoardConfig,
    pub games: Vec<GameRecord>,
    pub stats: MatchStats,
}

/// Play `config.games` games between `first` and `second`, swapping colours
/// after every game. `first` opens game 0.
pub fn run_match(
    first: &mut dyn Agent,
    second: &mut dyn Agent,
    board: &BoardConfig,
    config: &ArenaConfig,
) -> Result<MatchReport, ArenaError> {
    let mut report = MatchReport {
        first: first.name().to_string(),
        second: second.name().to_string(),
        board: *board,
        games: Vec::with_capacity(config.games),
        stats: MatchStats::new(),
    };

    for game_index in 0..config.games {
        let record = if Seat::First.colour(game_index) == Player::Black {
            play_game(first, second, board, config.move_limit)?
        } else {
            play_game(second, first, board, config.move_limit)?
        };
        report.stats.record_game(game_index, &record);
        report.games.push(record);
    }

    info!(
        first = %report.first,
        second = %report.second,
        games = report.stats.games,
        first_wins = report.stats.first_wins,
        second_wins = report.stats.second_wins,
        draws = report.stats.draws,
        "match finished"
    );
    Ok(report)
}
