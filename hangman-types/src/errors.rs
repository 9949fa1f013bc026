use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Failure kinds surfaced by user and game operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("a user named {name} already exists")]
    DuplicateName { name: String },
    #[error("no user named {name}")]
    UserNotFound { name: String },
    #[error("game {game_id} not found")]
    GameNotFound { game_id: String },
    #[error("game is already over")]
    GameOver,
    #[error("invalid guess {guess:?}: {reason}")]
    InvalidGuess {
        guess: String,
        reason: InvalidGuessReason,
    },
    #[error("letter {letter:?} was already guessed")]
    DuplicateGuess { letter: String },
}

/// Which validation stage rejected a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InvalidGuessReason {
    NotSingleCharacter,
    NotAlphabetic,
}

impl fmt::Display for InvalidGuessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidGuessReason::NotSingleCharacter => f.write_str("guess one letter at a time"),
            InvalidGuessReason::NotAlphabetic => f.write_str("guess must be a letter"),
        }
    }
}

impl GameError {
    pub fn game_not_found(game_id: impl ToString) -> Self {
        GameError::GameNotFound {
            game_id: game_id.to_string(),
        }
    }

    pub fn user_not_found(name: impl Into<String>) -> Self {
        GameError::UserNotFound { name: name.into() }
    }
}
