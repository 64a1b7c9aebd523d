use serde::{Deserialize, Serialize};

use super::game::{GameRecord, MatchOutcome};
use crate::game::Player;

/// Which of the two contestants of a match a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    /// Colour this seat plays in game `game_index`; the first seat opens
    /// the even-numbered games.
    pub fn colour(self, game_index: usize) -> Player {
        let first_is_black = game_index % 2 == 0;
        match (self, first_is_black) {
            (Seat::First, true) | (Seat::Second, false) => Player::Black,
            _ => Player::White,
        }
    }
}

/// Running tally of a match between two contestants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    /// Games stopped by the move limit.
    pub unfinished: usize,
    /// Wins by the side that moved first, whoever it was.
    pub black_wins: usize,
    pub total_moves: usize,
}

impl MatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game_index: usize, record: &GameRecord) {
        self.games += 1;
        self.total_moves += record.game_length();
        match record.outcome {
            MatchOutcome::Winner(winner) => {
                if winner == Player::Black {
                    self.black_wins += 1;
                }
                if winner == Seat::First.colour(game_index) {
                    self.first_wins += 1;
                } else {
                    self.second_wins += 1;
                }
            }
            MatchOutcome::Draw => self.draws += 1,
            MatchOutcome::MoveLimit => self.unfinished += 1,
        }
    }

    pub fn wins(&self, seat: Seat) -> usize {
        match seat {
            Seat::First => self.first_wins,
            Seat::Second => self.second_wins,
        }
    }

    pub fn win_rate(&self, seat: Seat) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins(seat) as f32 / self.games as f32
    }

    pub fn draw_rate(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.draws as f32 / self.games as f32
    }

    pub fn average_game_length(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_moves as f32 / self.games as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: MatchOutcome, length: usize) -> GameRecord {
        GameRecord {
            black: "A".into(),
            white: "B".into(),
            moves: vec![0; length],
            outcome,
            black_secs: 0.0,
            white_secs: 0.0,
        }
    }

    #[test]
    fn test_seats_alternate_colours() {
        assert_eq!(Seat::First.colour(0), Player::Black);
        assert_eq!(Seat::Second.colour(0), Player::White);
        assert_eq!(Seat::First.colour(1), Player::White);
        assert_eq!(Seat::Second.colour(1), Player::Black);
    }

    #[test]
    fn test_empty_stats() {
        let stats = MatchStats::new();
        assert_eq!(stats.win_rate(Seat::First), 0.0);
        assert_eq!(stats.draw_rate(), 0.0);
        assert_eq!(stats.average_game_length(), 0.0);
    }

    #[test]
    fn test_record_games() {
        let mut stats = MatchStats::new();
        // Game 0: first seat is Black and wins.
        stats.record_game(0, &record(MatchOutcome::Winner(Player::Black), 7));
        // Game 1: first seat is White and Black (second seat) wins.
        stats.record_game(1, &record(MatchOutcome::Winner(Player::Black), 9));
        stats.record_game(2, &record(MatchOutcome::Draw, 42));
        stats.record_game(3, &record(MatchOutcome::MoveLimit, 6));

        assert_eq!(stats.games, 4);
        assert_eq!(stats.wins(Seat::First), 1);
        assert_eq!(stats.wins(Seat::Second), 1);
        assert_eq!(stats.black_wins, 2);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.unfinished, 1);
        assert!((stats.win_rate(Seat::First) - 0.25).abs() < 1e-6);
        assert!((stats.draw_rate() - 0.25).abs() < 1e-6);
        assert!((stats.average_game_length() - 16.0).abs() < 1e-6);
    }
}
