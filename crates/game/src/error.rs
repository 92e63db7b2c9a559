//! Errors reported to callers of the game API.

use thiserror::Error;

/// Caller errors. Expected gameplay outcomes such as a missed cast are not
/// errors and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("player index {index} is out of range (roster has {count} slots)")]
    InvalidPlayer { index: usize, count: usize },

    #[error("unknown input code {0}")]
    UnknownInput(u8),

    #[error("level index {index} is out of range ({count} levels available)")]
    UnknownLevel { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, GameError>;
