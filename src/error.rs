use std::path::PathBuf;

/// Errors from applying or reverting a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("invalid column {column} (expected 0..{cols})")]
    InvalidColumn { column: usize, cols: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("game is already over")]
    GameAlreadyOver,

    #[error("no move to undo")]
    EmptyHistory,
}

/// Errors from constructing a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("{name} must be >= 1, got {value}")]
    InvalidDimension { name: &'static str, value: usize },
}

/// Errors from rebuilding a game out of a list of columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("illegal move {column} at position {index}: {source}")]
    IllegalMove {
        index: usize,
        column: usize,
        source: MoveError,
    },
}

/// Errors an agent can report instead of a column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("manual agent was asked to move without a candidate column")]
    MissingCandidate,

    #[error("search was cancelled")]
    Cancelled,

    #[error("search replayed an illegal move: {0}")]
    Move(#[from] MoveError),
}

/// Errors that can occur while running automated games.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("agent {agent} failed to move: {source}")]
    Agent { agent: String, source: AgentError },

    #[error("agent {agent} selected illegal column {column} (legal: {legal:?}): {source}")]
    IllegalMove {
        agent: String,
        column: usize,
        legal: Vec<usize>,
        source: MoveError,
    },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
