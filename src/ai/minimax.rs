use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AgentError;
use crate::game::{GameState, Player};

use super::agent::{Agent, DecisionHandle};
use super::evaluate::{Heuristic, PositionalHeuristic};
use super::transposition::{Bound, TableEntry, TranspositionTable};

/// Scores are reported from this player's point of view.
const MAXIMIZER: Player = Player::Black;

/// Search depth meaning "play the game out to the end".
pub const UNLIMITED_DEPTH: u32 = u32::MAX;

/// Minimax player configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    /// Plies searched, counting the move being chosen. Clamped to the
    /// number of empty cells, which also bounds the recursion.
    pub depth: u32,
    /// Seed for the tie-break among equally scored moves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Cache subtree scores keyed by (board, remaining depth, side to move).
    pub transposition_table: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        MinimaxConfig {
            depth: 5,
            seed: None,
            transposition_table: true,
        }
    }
}

impl MinimaxConfig {
    pub fn with_depth(depth: u32) -> Self {
        MinimaxConfig {
            depth,
            ..Default::default()
        }
    }
}

/// Minimax score of one candidate column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveScore {
    pub column: usize,
    pub score: i64,
}

/// Counters for the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub table_lookups: u64,
    pub table_hits: u64,
}

/// Depth-limited minimax agent with alpha-beta pruning.
///
/// Black maximizes and White minimizes. At the root every legal move gets an
/// exact score, and ties for the best score are broken uniformly at random
/// from a seedable generator.
pub struct MinimaxAgent {
    config: MinimaxConfig,
    heuristic: Box<dyn Heuristic>,
    rng: StdRng,
    table: Option<TranspositionTable>,
    handle: DecisionHandle,
    stats: SearchStats,
}

impl MinimaxAgent {
    pub fn new(config: MinimaxConfig) -> Self {
        Self::with_heuristic(config, Box::new(PositionalHeuristic::new()))
    }

    pub fn with_heuristic(config: MinimaxConfig, heuristic: Box<dyn Heuristic>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let table = config
            .transposition_table
            .then(TranspositionTable::default);
        MinimaxAgent {
            config,
            heuristic,
            rng,
            table,
            handle: DecisionHandle::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    /// Counters of the last `score_moves`/`on_move_ready` call.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn effective_depth(&self, state: &GameState) -> u32 {
        let empty = u32::try_from(state.board().empty_count()).unwrap_or(u32::MAX);
        self.config.depth.min(empty).max(1)
    }

    /// Exact minimax score of every legal move, in column order.
    ///
    /// The search runs on a private copy of `state`. The cancel flag of the
    /// decision handle is checked between sibling moves.
    pub fn score_moves(&mut self, state: &GameState) -> Result<Vec<MoveScore>, AgentError> {
        let mut scratch = state.copy();
        let moves = scratch.valid_moves();
        if moves.is_empty() {
            return Err(AgentError::NoLegalMoves);
        }

        self.stats = SearchStats::default();
        self.heuristic.prepare(&scratch);
        if let Some(table) = self.table.as_mut() {
            table.clear();
        }
        let depth = self.effective_depth(&scratch);

        let mut scores = Vec::with_capacity(moves.len());
        for column in moves {
            if self.handle.is_cancelled() {
                return Err(AgentError::Cancelled);
            }
            let Ok(mut child) = scratch.try_move(column) else {
                continue;
            };
            let score = self.minimax(&mut child, depth - 1, i64::MIN, i64::MAX)?;
            scores.push(MoveScore { column, score });
        }
        if let Some(table) = self.table.as_ref() {
            let table_stats = table.stats();
            self.stats.table_lookups = table_stats.lookups;
            self.stats.table_hits = table_stats.hits;
        }
        Ok(scores)
    }

    fn choose_move(&mut self, state: &GameState) -> Result<usize, AgentError> {
        let scores = self.score_moves(state)?;
        let player = state.current_player();
        let best = if player.is_maximizing() {
            scores.iter().map(|m| m.score).max()
        } else {
            scores.iter().map(|m| m.score).min()
        }
        .ok_or(AgentError::NoLegalMoves)?;

        let ties: Vec<usize> = scores
            .iter()
            .filter(|m| m.score == best)
            .map(|m| m.column)
            .collect();
        let column = ties[self.rng.random_range(0..ties.len())];

        debug!(
            player = player.name(),
            column,
            best,
            ties = ties.len(),
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            table_lookups = self.stats.table_lookups,
            table_hits = self.stats.table_hits,
            "minimax decision"
        );
        Ok(column)
    }

    fn leaf_score(&self, state: &GameState, depth: u32) -> i64 {
        let score = self.heuristic.evaluate(state, MAXIMIZER);
        // Remaining depth rewards quicker wins and slower losses.
        match state.winning_player() {
            Some(winner) if winner == MAXIMIZER => score + i64::from(depth),
            Some(_) => score - i64::from(depth),
            None => score,
        }
    }

    fn minimax(
        &mut self,
        state: &mut GameState,
        depth: u32,
        mut alpha: i64,
        mut beta: i64,
    ) -> Result<i64, AgentError> {
        self.stats.nodes += 1;

        let moves = state.valid_moves();
        if depth == 0 || moves.is_empty() {
            return Ok(self.leaf_score(state, depth));
        }

        let to_move = state.current_player();
        let (alpha_orig, beta_orig) = (alpha, beta);
        if let Some(table) = self.table.as_mut() {
            if let Some(entry) = table.lookup(state.board(), depth, to_move) {
                match entry.bound {
                    Bound::Exact => return Ok(entry.score),
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    return Ok(entry.score);
                }
            }
        }

        let maximizing = to_move.is_maximizing();
        let mut best = if maximizing { i64::MIN } else { i64::MAX };

        for column in moves {
            if self.handle.is_cancelled() {
                return Err(AgentError::Cancelled);
            }
            let Ok(mut child) = state.try_move(column) else {
                continue;
            };
            let score = self.minimax(&mut child, depth - 1, alpha, beta)?;
            drop(child);

            if maximizing {
                best = best.max(score);
                if score >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                if score <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
                beta = beta.min(score);
            }
        }

        if let Some(table) = self.table.as_mut() {
            let bound = if best <= alpha_orig {
                Bound::Upper
            } else if best >= beta_orig {
                Bound::Lower
            } else {
                Bound::Exact
            };
            table.store(state.board(), depth, to_move, TableEntry { score: best, bound });
        }

        Ok(best)
    }
}

impl Agent for MinimaxAgent {
    fn on_move_ready(
        &mut self,
        _candidate: Option<usize>,
        state: &GameState,
    ) -> Result<usize, AgentError> {
        let handle = self.handle.clone();
        let _scope = handle.begin();
        self.choose_move(state)
    }

    fn name(&self) -> &str {
        "Minimax"
    }

    fn is_automated(&self) -> bool {
        true
    }

    fn decision_handle(&self) -> Option<DecisionHandle> {
        Some(self.handle.clone())
    }

    fn clone_agent(&self) -> Box<dyn Agent> {
        Box::new(MinimaxAgent::with_heuristic(
            self.config.clone(),
            self.heuristic.clone_box(),
        ))
    }
}
