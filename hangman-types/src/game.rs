use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type GameId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Outward form of a game. The target word is only filled in once the game is over.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameView {
    pub urlsafe_key: String,
    pub user_name: String,
    pub guessed_word: String,
    pub letters_guessed: String,
    pub attempts_allowed: i32,
    pub attempts_remaining: i32,
    pub game_over: bool,
    pub status: GameStatus,
    pub history: Vec<String>,
    pub target: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameListView {
    pub items: Vec<GameView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreView {
    pub user_name: String,
    pub date: String, // ISO 8601 date
    pub won: bool,
    pub guesses: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreListView {
    pub items: Vec<ScoreView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameHistoryView {
    pub urlsafe_key: String,
    pub history: Vec<String>,
}
