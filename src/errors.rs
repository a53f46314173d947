use thiserror::Error;

use crate::domain::{MatchId, PlayerId};

/// Errors surfaced by the ladder engine and its store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LadderError {
    #[error("player {id} not found")]
    PlayerNotFound { id: PlayerId },

    #[error("no player named \"{name}\"")]
    UnknownPlayerName { name: String },

    #[error("match {id} not found")]
    MatchNotFound { id: MatchId },

    #[error("year {year} not found")]
    YearNotFound { year: i32 },

    #[error("invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("invalid player: {reason}")]
    InvalidPlayer { reason: String },

    #[error("player \"{name}\" already exists")]
    DuplicatePlayer { name: String },

    #[error("need {needed} available players, got {available}")]
    NotEnoughPlayers { needed: usize, available: usize },
}

impl LadderError {
    pub fn invalid_match(reason: impl Into<String>) -> Self {
        LadderError::InvalidMatch { reason: reason.into() }
    }

    pub fn invalid_player(reason: impl Into<String>) -> Self {
        LadderError::InvalidPlayer { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, LadderError>;
