//! Errors raised before a match starts.
//!
//! Once an engine exists nothing it does is fallible: out-of-turn input is
//! dropped, not reported.

use thiserror::Error;

use crate::settings::MatchFormat;

/// A match setup that the engine refuses to start from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("at least 2 players required, found {found}")]
    NotEnoughPlayers { found: usize },

    #[error("{format} format requires exactly 2 players, found {found}")]
    WrongPlayerCount { format: MatchFormat, found: usize },

    #[error("player name at position {position} is empty")]
    EmptyPlayerName { position: usize },

    #[error("player {name:?} appears more than once")]
    DuplicatePlayer { name: String },

    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },

    #[error("{field} of {value} is too large")]
    LimitTooLarge { field: &'static str, value: u32 },
}

/// Failure to turn a configuration file into a match setup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid match setup: {0}")]
    Setup(#[from] SetupError),
}

/// A scoring-script token that is not a known action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised scoring action {0:?}")]
pub struct ParseActionError(pub String);
