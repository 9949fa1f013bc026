use hangman_types::{GameError, GameId, GameStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::guess_validation::{validate_guess, GuessContext};
use crate::score_ledger::GameCompletion;
use crate::WordBank;

pub const DEFAULT_ATTEMPTS_ALLOWED: i32 = 13;
pub const PLACEHOLDER: char = '_';

pub const HIT_MESSAGE: &str = "That letter is in the target word!";
pub const MISS_MESSAGE: &str = "That letter is not in the target word!";
pub const WIN_MESSAGE: &str = "You guessed the correct word!";
pub const LOSS_MESSAGE: &str = "Game over!";

/// A single hangman game. The owner is referenced by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub user_name: String,
    pub target: String, // Hidden from clients until the game is over
    pub guessed_word: String,
    pub letters_guessed: Vec<char>,
    pub correct_letters: Vec<char>,
    pub attempts_allowed: i32,
    pub attempts_remaining: i32,
    pub game_over: bool,
    pub history: Vec<char>,
}

/// Result of one accepted guess. Terminal outcomes carry the hand-off that the
/// storage layer must apply in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Hit,
    Miss,
    Won(GameCompletion),
    Lost(GameCompletion),
}

impl MoveOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            MoveOutcome::Hit => HIT_MESSAGE,
            MoveOutcome::Miss => MISS_MESSAGE,
            MoveOutcome::Won(_) => WIN_MESSAGE,
            MoveOutcome::Lost(_) => LOSS_MESSAGE,
        }
    }

    pub fn completion(&self) -> Option<&GameCompletion> {
        match self {
            MoveOutcome::Won(completion) | MoveOutcome::Lost(completion) => Some(completion),
            MoveOutcome::Hit | MoveOutcome::Miss => None,
        }
    }
}

/// Render `target` with every position whose letter is in `letters_guessed` revealed.
pub fn reveal(target: &str, letters_guessed: &[char]) -> String {
    target
        .chars()
        .map(|c| {
            if letters_guessed.contains(&c) {
                c
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}

impl Game {
    pub fn new(id: GameId, user_name: String, target: String, attempts_allowed: i32) -> Self {
        let guessed_word = reveal(&target, &[]);
        Self {
            id,
            user_name,
            target,
            guessed_word,
            letters_guessed: Vec::new(),
            correct_letters: Vec::new(),
            attempts_allowed,
            attempts_remaining: attempts_allowed,
            game_over: false,
            history: Vec::new(),
        }
    }

    /// Start a game for `user_name` against a random word from the bank.
    pub fn create(user_name: &str, word_bank: &WordBank, attempts_allowed: i32) -> Self {
        let game = Self::new(
            Uuid::new_v4(),
            user_name.to_string(),
            word_bank.random_word().to_string(),
            attempts_allowed,
        );
        info!("Created game {} for user {}", game.id, game.user_name);
        game
    }

    pub fn status(&self) -> GameStatus {
        if !self.game_over {
            GameStatus::InProgress
        } else if self.guessed_word == self.target {
            GameStatus::Won
        } else {
            GameStatus::Lost
        }
    }

    pub fn guesses_used(&self) -> i32 {
        self.attempts_allowed - self.attempts_remaining
    }

    /// Apply one letter. On error the game is left untouched.
    pub fn apply_guess(&mut self, guess: &str) -> Result<MoveOutcome, GameError> {
        let letter = validate_guess(&GuessContext {
            game_over: self.game_over,
            letters_guessed: &self.letters_guessed,
            guess,
        })?;

        self.history.push(letter);
        self.letters_guessed.push(letter);

        let hit = self.target.contains(letter);
        if hit {
            self.correct_letters.push(letter);
            self.guessed_word = reveal(&self.target, &self.letters_guessed);
        } else {
            self.attempts_remaining -= 1;
        }
        debug!(
            "Game {}: guess {:?} {} ({} attempts left)",
            self.id,
            letter,
            if hit { "hit" } else { "missed" },
            self.attempts_remaining
        );

        // Win is checked before loss.
        if self.guessed_word == self.target {
            return Ok(MoveOutcome::Won(self.end_game(true)));
        }
        if self.attempts_remaining < 1 {
            return Ok(MoveOutcome::Lost(self.end_game(false)));
        }

        Ok(if hit { MoveOutcome::Hit } else { MoveOutcome::Miss })
    }

    fn end_game(&mut self, won: bool) -> GameCompletion {
        debug_assert!(!self.game_over, "a game can only end once");
        self.game_over = true;
        info!(
            "Game {} for {} ended: {}",
            self.id,
            self.user_name,
            if won { "won" } else { "lost" }
        );
        GameCompletion {
            game_id: self.id,
            user_name: self.user_name.clone(),
            won,
            guesses: self.guesses_used(),
        }
    }
}
