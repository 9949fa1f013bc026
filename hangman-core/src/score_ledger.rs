use chrono::NaiveDate;
use hangman_types::GameId;
use serde::{Deserialize, Serialize};

/// Everything the end of a game hands to storage: the owner's counter update and
/// the score to append. Both land together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCompletion {
    pub game_id: GameId,
    pub user_name: String,
    pub won: bool,
    pub guesses: i32,
}

impl GameCompletion {
    pub fn into_score(self, date: NaiveDate) -> ScoreRecord {
        ScoreRecord {
            game_id: self.game_id,
            user_name: self.user_name,
            date,
            won: self.won,
            guesses: self.guesses,
        }
    }
}

/// Immutable record of one finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub game_id: GameId,
    pub user_name: String,
    pub date: NaiveDate,
    pub won: bool,
    pub guesses: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOrder {
    /// Order the scores were recorded in.
    Recorded,
    /// Ascending by guesses, ties in recording order. Losses are not filtered out.
    FewestGuesses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreQuery {
    pub user_name: Option<String>,
    pub order: ScoreOrder,
    pub limit: Option<u64>,
}

impl ScoreQuery {
    pub fn all() -> Self {
        Self {
            user_name: None,
            order: ScoreOrder::Recorded,
            limit: None,
        }
    }

    pub fn for_user(user_name: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            ..Self::all()
        }
    }

    pub fn high_scores(limit: Option<u64>) -> Self {
        Self {
            user_name: None,
            order: ScoreOrder::FewestGuesses,
            limit,
        }
    }

    /// Evaluate the query over scores held in recording order.
    pub fn apply<'a, I>(&self, scores: I) -> Vec<ScoreRecord>
    where
        I: IntoIterator<Item = &'a ScoreRecord>,
    {
        let mut selected: Vec<ScoreRecord> = scores
            .into_iter()
            .filter(|s| self.user_name.as_ref().is_none_or(|name| &s.user_name == name))
            .cloned()
            .collect();

        if self.order == ScoreOrder::FewestGuesses {
            // sort_by_key is stable, which keeps recording order for ties
            selected.sort_by_key(|s| s.guesses);
        }
        if let Some(limit) = self.limit {
            selected.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        selected
    }
}
