mod agent;
pub mod evaluate;
mod manual;
pub mod mcts;
pub mod minimax;
mod random;
pub mod transposition;

pub use agent::{Agent, DecisionHandle};
pub use evaluate::{Heuristic, PositionalHeuristic, WeightTable};
pub use manual::ManualAgent;
pub use mcts::{MctsAgent, MctsConfig};
pub use minimax::{MinimaxAgent, MinimaxConfig, MoveScore, SearchStats};
pub use random::RandomAgent;
pub use transposition::TranspositionTable;
