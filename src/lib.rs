//! # Connect X
//!
//! A generalized connect-four engine: any board size and win length, a
//! reversible move engine, win detection across all four line orientations
//! and a minimax player with alpha-beta pruning, a positional heuristic and
//! an optional transposition table.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, game state machine and win detection
//! - [`ai`]: Agent trait, manual/random/minimax/MCTS agents, evaluation, transposition table
//! - [`arena`]: Automated games and matches between two agents
//! - [`ui`]: Terminal UI for playing against the computer
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
