//! Ordered checks a submitted guess must pass before it touches game state.
//!
//! Stages run in a fixed order and the first failure wins, so a guess of `"12"`
//! against a finished game reports `GameOver` rather than `InvalidGuess`.

use hangman_types::{GameError, InvalidGuessReason};

/// What the pipeline needs to know about the game being played.
#[derive(Debug, Clone, Copy)]
pub struct GuessContext<'a> {
    pub game_over: bool,
    pub letters_guessed: &'a [char],
    pub guess: &'a str,
}

type Stage = fn(&GuessContext<'_>) -> Result<(), GameError>;

const PIPELINE: &[Stage] = &[
    ensure_in_progress,
    ensure_single_character,
    ensure_alphabetic,
    ensure_not_repeated,
];

/// Run every stage and hand back the accepted letter.
pub fn validate_guess(ctx: &GuessContext<'_>) -> Result<char, GameError> {
    for stage in PIPELINE {
        stage(ctx)?;
    }
    single_char(ctx.guess).ok_or_else(|| invalid(ctx, InvalidGuessReason::NotSingleCharacter))
}

fn ensure_in_progress(ctx: &GuessContext<'_>) -> Result<(), GameError> {
    if ctx.game_over {
        return Err(GameError::GameOver);
    }
    Ok(())
}

fn ensure_single_character(ctx: &GuessContext<'_>) -> Result<(), GameError> {
    match single_char(ctx.guess) {
        Some(_) => Ok(()),
        None => Err(invalid(ctx, InvalidGuessReason::NotSingleCharacter)),
    }
}

fn ensure_alphabetic(ctx: &GuessContext<'_>) -> Result<(), GameError> {
    if ctx.guess.chars().all(char::is_alphabetic) {
        Ok(())
    } else {
        Err(invalid(ctx, InvalidGuessReason::NotAlphabetic))
    }
}

// Exact match against what was stored; "A" and "a" are different guesses.
fn ensure_not_repeated(ctx: &GuessContext<'_>) -> Result<(), GameError> {
    match single_char(ctx.guess) {
        Some(letter) if ctx.letters_guessed.contains(&letter) => Err(GameError::DuplicateGuess {
            letter: letter.to_string(),
        }),
        _ => Ok(()),
    }
}

fn single_char(guess: &str) -> Option<char> {
    let mut chars = guess.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Some(letter),
        _ => None,
    }
}

fn invalid(ctx: &GuessContext<'_>, reason: InvalidGuessReason) -> GameError {
    GameError::InvalidGuess {
        guess: ctx.guess.to_string(),
        reason,
    }
}
