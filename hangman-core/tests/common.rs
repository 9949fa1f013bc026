#![allow(dead_code)]

use hangman_core::{Game, MoveOutcome, UserRecord, WordBank};
use uuid::Uuid;

/// Creates a test word bank with a known set of words
pub fn create_test_bank() -> WordBank {
    WordBank::from_word_list("cat\ndog\nbat\ndosa\ndinosaur\nbiscuits").unwrap()
}

/// Creates a game with a specific target word
pub fn create_game_with_word(word: &str, attempts_allowed: i32) -> Game {
    Game::new(Uuid::new_v4(), "tester".to_string(), word.to_string(), attempts_allowed)
}

pub fn create_test_user(name: &str) -> UserRecord {
    UserRecord::new(name, Some(format!("{}@test.com", name.to_lowercase())))
}

/// Plays each guess in order, panicking on a rejected guess
pub fn play(game: &mut Game, guesses: &[&str]) -> Vec<MoveOutcome> {
    guesses
        .iter()
        .map(|guess| {
            game.apply_guess(guess)
                .unwrap_or_else(|e| panic!("guess {:?} rejected: {}", guess, e))
        })
        .collect()
}

/// Applies a finished game's outcome to its owner, the way storage does
pub fn settle(user: &mut UserRecord, outcome: &MoveOutcome) {
    if let Some(completion) = outcome.completion() {
        user.record_result(completion.won);
    }
}
