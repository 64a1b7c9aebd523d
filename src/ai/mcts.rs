use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AgentError;
use crate::game::{GameState, Player};

use super::agent::{Agent, DecisionHandle};

/// Monte Carlo tree search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Playouts per decision.
    pub iterations: u32,
    /// UCT exploration constant.
    pub exploration: f64,
    /// Seed for expansion order and rollouts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            iterations: 300,
            exploration: 1.0,
            seed: None,
        }
    }
}

impl MctsConfig {
    pub fn with_iterations(iterations: u32) -> Self {
        MctsConfig {
            iterations,
            ..Default::default()
        }
    }
}

/// A single node in the search tree.
#[derive(Debug)]
struct MctsNode {
    /// Column played to reach this node. `None` at the root.
    column: Option<usize>,
    /// Player who played `column`.
    mover: Option<Player>,
    parent: Option<usize>,
    visits: u32,
    /// Sum of playout rewards for `mover`.
    reward: f64,
    children: Vec<usize>,
    untried: Vec<usize>,
}

impl MctsNode {
    fn new(
        column: Option<usize>,
        mover: Option<Player>,
        parent: Option<usize>,
        state: &GameState,
    ) -> Self {
        MctsNode {
            column,
            mover,
            parent,
            visits: 0,
            reward: 0.0,
            children: Vec::new(),
            untried: state.valid_moves(),
        }
    }

    fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / f64::from(self.visits)
        }
    }
}

/// Arena-allocated search tree rooted at index 0.
struct MctsTree {
    nodes: Vec<MctsNode>,
}

impl MctsTree {
    fn new(root: &GameState) -> Self {
        MctsTree {
            nodes: vec![MctsNode::new(None, None, None, root)],
        }
    }

    /// Child of `parent` with the highest UCT value.
    fn select_child(&self, parent: usize, exploration: f64) -> Option<usize> {
        let node = &self.nodes[parent];
        let log_parent = f64::from(node.visits.max(1)).ln();

        node.children.iter().copied().max_by(|&a, &b| {
            let uct = |idx: usize| {
                let child = &self.nodes[idx];
                let visits = f64::from(child.visits.max(1));
                child.mean_reward() + exploration * (log_parent / visits).sqrt()
            };
            uct(a).total_cmp(&uct(b))
        })
    }

    fn add_child(
        &mut self,
        parent: usize,
        column: usize,
        mover: Player,
        state: &GameState,
    ) -> usize {
        let idx = self.nodes.len();
        self.nodes
            .push(MctsNode::new(Some(column), Some(mover), Some(parent), state));
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Propagate a finished playout from `leaf` up to the root.
    fn backup(&mut self, leaf: usize, winner: Option<Player>) {
        let mut current = Some(leaf);
        while let Some(idx) = current {
            let node = &mut self.nodes[idx];
            node.visits += 1;
            if let Some(mover) = node.mover {
                node.reward += match winner {
                    Some(w) if w == mover => 1.0,
                    Some(_) => 0.0,
                    None => 0.5,
                };
            }
            current = node.parent;
        }
    }

    /// Most visited root child.
    fn best_column(&self) -> Option<usize> {
        self.nodes[0]
            .children
            .iter()
            .map(|&idx| &self.nodes[idx])
            .max_by_key(|child| child.visits)
            .and_then(|child| child.column)
    }
}

/// UCT player that scores moves by random playouts to the end of the game.
///
/// Each iteration descends the tree by UCT, expands one untried move,
/// finishes the game with uniformly random moves and credits the result to
/// every node on the path. The most visited root move is played.
pub struct MctsAgent {
    config: MctsConfig,
    rng: StdRng,
    handle: DecisionHandle,
}

impl MctsAgent {
    pub fn new(config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        MctsAgent {
            config,
            rng,
            handle: DecisionHandle::new(),
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    fn run_simulation(
        &mut self,
        tree: &mut MctsTree,
        root: &GameState,
    ) -> Result<(), AgentError> {
        let mut state = root.copy();
        let mut node = 0;

        // Selection
        while tree.nodes[node].untried.is_empty() && !state.is_terminal() {
            let Some(child) = tree.select_child(node, self.config.exploration) else {
                break;
            };
            if let Some(column) = tree.nodes[child].column {
                state.insert(column)?;
            }
            node = child;
        }

        // Expansion
        if !state.is_terminal() && !tree.nodes[node].untried.is_empty() {
            let pick = self.rng.random_range(0..tree.nodes[node].untried.len());
            let column = tree.nodes[node].untried.swap_remove(pick);
            let mover = state.current_player();
            state.insert(column)?;
            node = tree.add_child(node, column, mover, &state);
        }

        // Rollout
        while !state.is_terminal() {
            let moves = state.valid_moves();
            state.insert(moves[self.rng.random_range(0..moves.len())])?;
        }

        tree.backup(node, state.winning_player());
        Ok(())
    }

    fn choose_move(&mut self, state: &GameState) -> Result<usize, AgentError> {
        let moves = state.valid_moves();
        match moves.as_slice() {
            [] => return Err(AgentError::NoLegalMoves),
            [only] => return Ok(*only),
            _ => {}
        }

        let mut tree = MctsTree::new(state);
        for _ in 0..self.config.iterations.max(1) {
            if self.handle.is_cancelled() {
                return Err(AgentError::Cancelled);
            }
            self.run_simulation(&mut tree, state)?;
        }

        let column = tree.best_column().ok_or(AgentError::NoLegalMoves)?;
        debug!(
            player = state.current_player().name(),
            column,
            iterations = self.config.iterations,
            nodes = tree.nodes.len(),
            "mcts decision"
        );
        Ok(column)
    }
}

impl Agent for MctsAgent {
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
        "MCTS"
    }

    fn is_automated(&self) -> bool {
        true
    }

    fn decision_handle(&self) -> Option<DecisionHandle> {
        Some(self.handle.clone())
    }

    fn clone_agent(&self) -> Box<dyn Agent> {
        Box::new(MctsAgent::new(self.config.clone()))
    }
}
