use hangman_types::GameError;
use warp::http::StatusCode;

/// Failure of a service operation: either a domain rule or the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("storage failure: {0}")]
    Storage(anyhow::Error),
}

// Repositories report rule violations as a GameError inside anyhow
impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<GameError>() {
            Ok(game_error) => ServiceError::Game(game_error),
            Err(err) => ServiceError::Storage(err),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Game(GameError::DuplicateName { .. })
            | ServiceError::Game(GameError::GameOver)
            | ServiceError::Game(GameError::DuplicateGuess { .. }) => StatusCode::CONFLICT,
            ServiceError::Game(GameError::UserNotFound { .. })
            | ServiceError::Game(GameError::GameNotFound { .. }) => StatusCode::NOT_FOUND,
            ServiceError::Game(GameError::InvalidGuess { .. }) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Game(err) => err.to_string(),
            ServiceError::Storage(_) => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangman_types::InvalidGuessReason;

    #[test]
    fn test_anyhow_downcast_keeps_game_errors_typed() {
        let err: ServiceError = anyhow::Error::from(GameError::GameOver).into();
        assert!(matches!(err, ServiceError::Game(GameError::GameOver)));

        let err: ServiceError = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                GameError::DuplicateName {
                    name: "a".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (GameError::user_not_found("a"), StatusCode::NOT_FOUND),
            (GameError::game_not_found("g"), StatusCode::NOT_FOUND),
            (GameError::GameOver, StatusCode::CONFLICT),
            (
                GameError::InvalidGuess {
                    guess: "1".to_string(),
                    reason: InvalidGuessReason::NotAlphabetic,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                GameError::DuplicateGuess {
                    letter: "a".to_string(),
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ServiceError::from(err).status_code(), status);
        }
    }
}
