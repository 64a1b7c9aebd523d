use crate::error::AgentError;
use crate::game::GameState;

use super::agent::Agent;

/// A human seat: plays whatever column the caller proposes.
///
/// Legality is left to `GameState::insert`, so an illegal proposal surfaces
/// as the usual `MoveError` there.
#[derive(Debug, Clone, Default)]
pub struct ManualAgent;

impl ManualAgent {
    pub fn new() -> Self {
        ManualAgent
    }
}

impl Agent for ManualAgent {
    fn on_move_ready(
        &mut self,
        candidate: Option<usize>,
        _state: &GameState,
    ) -> Result<usize, AgentError> {
        candidate.ok_or(AgentError::MissingCandidate)
    }

    fn name(&self) -> &str {
        "Manual"
    }

    fn is_automated(&self) -> bool {
        false
    }

    fn clone_agent(&self) -> Box<dyn Agent> {
        Box::new(self.clone())
    }
}
