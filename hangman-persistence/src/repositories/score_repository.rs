use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entities::{prelude::*, scores};
use hangman_core::{ScoreOrder, ScoreQuery, ScoreRecord};

/// Read side of the score ledger. Scores are only ever written by
/// `GameRepository::complete_game`.
pub struct ScoreRepository {
    db: DatabaseConnection,
}

impl ScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_score(model: scores::Model) -> ScoreRecord {
        ScoreRecord {
            game_id: model.game_id,
            user_name: model.user_name,
            date: model.date,
            won: model.won,
            guesses: model.guesses,
        }
    }

    pub async fn query(&self, query: &ScoreQuery) -> Result<Vec<ScoreRecord>> {
        let mut select = Scores::find();

        if let Some(user_name) = &query.user_name {
            select = select.filter(scores::Column::UserName.eq(user_name.as_str()));
        }

        // The autoincrement id preserves recording order and breaks ties
        select = match query.order {
            ScoreOrder::Recorded => select.order_by_asc(scores::Column::Id),
            ScoreOrder::FewestGuesses => select
                .order_by_asc(scores::Column::Guesses)
                .order_by_asc(scores::Column::Id),
        };

        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        let scores = select.all(&self.db).await?;
        Ok(scores.into_iter().map(Self::model_to_score).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::repositories::{GameRepository, UserRepository};
    use hangman_core::Game;
    use migration::{Migrator, MigratorTrait};
    use uuid::Uuid;

    /// Plays `misses` wrong letters and then finishes the game. Returns the stored score.
    async fn finish_game(
        users: &UserRepository,
        games: &GameRepository,
        user: &str,
        won: bool,
        misses: usize,
    ) -> ScoreRecord {
        if users.find_by_name(user).await.unwrap().is_none() {
            users.create_user(user, None).await.unwrap();
        }
        let attempts = if won { 13 } else { misses as i32 };
        let mut game = Game::new(Uuid::new_v4(), user.to_string(), "cat".to_string(), attempts);
        games.insert_game(&game).await.unwrap();

        let wrong = ["q", "w", "e", "r", "y", "u", "i", "o", "p"];
        let mut guesses: Vec<&str> = wrong[..misses].to_vec();
        if won {
            guesses.extend(["c", "a", "t"]);
        }
        for guess in guesses {
            let outcome = game.apply_guess(guess).unwrap();
            if let Some(completion) = outcome.completion() {
                return games.complete_game(&game, completion).await.unwrap();
            }
            games.save_progress(&game).await.unwrap();
        }
        panic!("game did not finish");
    }

    async fn setup() -> (UserRepository, GameRepository, ScoreRepository) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        (
            UserRepository::new(db.clone()),
            GameRepository::new(db.clone()),
            ScoreRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_empty_ledger() {
        let (_users, _games, scores) = setup().await;
        assert!(scores.query(&ScoreQuery::all()).await.unwrap().is_empty());
        assert!(scores.query(&ScoreQuery::high_scores(Some(5))).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_queries_match_in_memory_semantics() {
        let (users, games, scores) = setup().await;

        let mut recorded = Vec::new();
        recorded.push(finish_game(&users, &games, "alice", true, 4).await);
        recorded.push(finish_game(&users, &games, "bob", false, 1).await);
        recorded.push(finish_game(&users, &games, "alice", true, 2).await);
        recorded.push(finish_game(&users, &games, "carol", true, 2).await);
        recorded.push(finish_game(&users, &games, "bob", true, 0).await);

        let queries = [
            ScoreQuery::all(),
            ScoreQuery::for_user("alice"),
            ScoreQuery::for_user("nobody"),
            ScoreQuery::high_scores(None),
            ScoreQuery::high_scores(Some(3)),
        ];
        for query in &queries {
            let stored = scores.query(query).await.unwrap();
            assert_eq!(stored, query.apply(&recorded), "mismatch for {:?}", query);
        }
    }

    #[tokio::test]
    async fn test_high_scores_include_quick_losses() {
        let (users, games, scores) = setup().await;
        finish_game(&users, &games, "alice", true, 3).await;
        finish_game(&users, &games, "bob", false, 1).await;

        let board = scores.query(&ScoreQuery::high_scores(None)).await.unwrap();
        assert_eq!(board[0].user_name, "bob");
        assert!(!board[0].won);
        assert_eq!(board[0].guesses, 1);
        assert_eq!(board[1].guesses, 3);
    }
}
