use crate::error::AgentError;
use crate::game::GameState;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
            seed: None,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn on_move_ready(
        &mut self,
        _candidate: Option<usize>,
        state: &GameState,
    ) -> Result<usize, AgentError> {
        let actions = state.valid_moves();
        if actions.is_empty() {
            return Err(AgentError::NoLegalMoves);
        }
        let idx = self.rng.random_range(0..actions.len());
        Ok(actions[idx])
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn is_automated(&self) -> bool {
        true
    }

    fn clone_agent(&self) -> Box<dyn Agent> {
        Box::new(match self.seed {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        })
    }
}
