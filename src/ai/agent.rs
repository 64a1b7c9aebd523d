use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AgentError;
use crate::game::GameState;

/// Shared flags describing an automated decision in flight.
///
/// Cloning shares the flags, so a caller can keep a handle while the agent
/// itself runs elsewhere.
#[derive(Debug, Clone, Default)]
pub struct DecisionHandle {
    in_decision: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl DecisionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a decision is being computed.
    pub fn in_decision(&self) -> bool {
        self.in_decision.load(Ordering::Acquire)
    }

    /// Ask the running decision to stop at the next sibling move. A request
    /// made before the decision starts applies to it as well.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Mark a decision as started. Both flags drop back when the scope ends.
    pub(crate) fn begin(&self) -> DecisionScope<'_> {
        self.in_decision.store(true, Ordering::Release);
        DecisionScope { handle: self }
    }
}

pub(crate) struct DecisionScope<'a> {
    handle: &'a DecisionHandle,
}

impl Drop for DecisionScope<'_> {
    fn drop(&mut self) {
        self.handle.in_decision.store(false, Ordering::Release);
        self.handle.cancel.store(false, Ordering::Release);
    }
}

/// Common interface for every seat at the board, manual or automated.
///
/// A caller asks the agent for a column with [`on_move_ready`](Agent::on_move_ready)
/// and uses [`disable_move`](Agent::disable_move) to decide whether human
/// input should be accepted for this seat.
pub trait Agent: Send {
    /// Pick a column for the side to move in `state`.
    ///
    /// `candidate` is the column proposed by a human, if any; automated
    /// agents ignore it.
    fn on_move_ready(
        &mut self,
        candidate: Option<usize>,
        state: &GameState,
    ) -> Result<usize, AgentError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Whether the agent chooses moves on its own.
    fn is_automated(&self) -> bool;

    /// Whether human move input must be ignored for this seat.
    fn disable_move(&self) -> bool {
        self.is_automated()
    }

    /// Flags of the decision in flight, for agents that take noticeable time.
    fn decision_handle(&self) -> Option<DecisionHandle> {
        None
    }

    /// Clone the agent into a boxed trait object.
    fn clone_agent(&self) -> Box<dyn Agent>;
}
