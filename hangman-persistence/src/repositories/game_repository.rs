use anyhow::{anyhow, Result};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::{games, prelude::*, scores, users};
use crate::repositories::UserRepository;
use hangman_core::{Game, GameCompletion, ScoreRecord};
use hangman_types::{GameError, GameId};

pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_game(model: games::Model) -> Result<Game> {
        let history: Vec<char> = serde_json::from_str(&model.history)
            .map_err(|e| anyhow!("Corrupt history for game {}: {}", model.id, e))?;

        Ok(Game {
            id: model.id,
            user_name: model.user_name,
            target: model.target,
            guessed_word: model.guessed_word,
            letters_guessed: model.letters_guessed.chars().collect(),
            correct_letters: model.correct_letters.chars().collect(),
            attempts_allowed: model.attempts_allowed,
            attempts_remaining: model.attempts_remaining,
            game_over: model.game_over,
            history,
        })
    }

    /// Columns a move may change.
    fn progress_columns(game: &Game) -> Result<games::ActiveModel> {
        Ok(games::ActiveModel {
            guessed_word: ActiveValue::Set(game.guessed_word.clone()),
            letters_guessed: ActiveValue::Set(game.letters_guessed.iter().collect()),
            correct_letters: ActiveValue::Set(game.correct_letters.iter().collect()),
            attempts_remaining: ActiveValue::Set(game.attempts_remaining),
            game_over: ActiveValue::Set(game.game_over),
            history: ActiveValue::Set(serde_json::to_string(&game.history)?),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
            ..Default::default()
        })
    }

    /// Update an in-progress row. Returns whether a row was changed; a game that is
    /// already over in storage is never touched.
    async fn update_in_progress<C: ConnectionTrait>(db: &C, game: &Game) -> Result<bool> {
        let result = Games::update_many()
            .set(Self::progress_columns(game)?)
            .filter(games::Column::Id.eq(game.id))
            .filter(games::Column::GameOver.eq(false))
            .exec(db)
            .await?;
        Ok(result.rows_affected == 1)
    }

    pub async fn insert_game(&self, game: &Game) -> Result<()> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let model = games::ActiveModel {
            id: ActiveValue::Set(game.id),
            user_name: ActiveValue::Set(game.user_name.clone()),
            target: ActiveValue::Set(game.target.clone()),
            attempts_allowed: ActiveValue::Set(game.attempts_allowed),
            created_at: ActiveValue::Set(now),
            ..Self::progress_columns(game)?
        };

        Games::insert(model).exec_without_returning(&self.db).await?;
        debug!("Stored new game {}", game.id);
        Ok(())
    }

    pub async fn find_by_id(&self, id: GameId) -> Result<Option<Game>> {
        Games::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Self::model_to_game)
            .transpose()
    }

    /// Persist a non-terminal move.
    pub async fn save_progress(&self, game: &Game) -> Result<()> {
        if game.game_over {
            return Err(anyhow!(
                "Game {} is over; use complete_game to persist it",
                game.id
            ));
        }
        if !Self::update_in_progress(&self.db, game).await? {
            return Err(self.missing_or_over(game.id).await);
        }
        Ok(())
    }

    /// Persist a finished game, the owner's new counters and the score in one
    /// transaction. Nothing is written unless all three land.
    pub async fn complete_game(
        &self,
        game: &Game,
        completion: &GameCompletion,
    ) -> Result<ScoreRecord> {
        if !game.game_over || completion.game_id != game.id {
            return Err(anyhow!("Game {} has not reached a terminal state", game.id));
        }

        let txn = self.db.begin().await?;

        // Only the first termination may flip game_over
        if !Self::update_in_progress(&txn, game).await? {
            drop(txn);
            return Err(self.missing_or_over(game.id).await);
        }

        let owner = Users::find_by_id(completion.user_name.clone())
            .one(&txn)
            .await?
            .ok_or_else(|| GameError::user_not_found(&completion.user_name))?;
        let mut record = UserRepository::model_to_user(owner.clone());
        record.record_result(completion.won);

        let mut owner: users::ActiveModel = owner.into();
        owner.wins = ActiveValue::Set(record.wins);
        owner.total_games = ActiveValue::Set(record.total_games);
        owner.updated_at = ActiveValue::Set(chrono::Utc::now().into());
        owner.update(&txn).await?;

        let score = completion.clone().into_score(chrono::Utc::now().date_naive());
        let score_model = scores::ActiveModel {
            id: ActiveValue::NotSet,
            game_id: ActiveValue::Set(score.game_id),
            user_name: ActiveValue::Set(score.user_name.clone()),
            date: ActiveValue::Set(score.date),
            won: ActiveValue::Set(score.won),
            guesses: ActiveValue::Set(score.guesses),
        };
        Scores::insert(score_model).exec_without_returning(&txn).await?;

        txn.commit().await?;
        info!(
            "Recorded {} for {} in game {} after {} missed guesses",
            if score.won { "win" } else { "loss" },
            score.user_name,
            score.game_id,
            score.guesses
        );
        Ok(score)
    }

    /// Delete a game that is still in progress. No score or counters are touched.
    pub async fn delete_active_game(&self, id: GameId) -> Result<()> {
        let result = Games::delete_many()
            .filter(games::Column::Id.eq(id))
            .filter(games::Column::GameOver.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(self.missing_or_over(id).await);
        }
        info!("Cancelled game {}", id);
        Ok(())
    }

    pub async fn active_games_for_user(&self, user_name: &str) -> Result<Vec<Game>> {
        Games::find()
            .filter(games::Column::UserName.eq(user_name))
            .filter(games::Column::GameOver.eq(false))
            .order_by_asc(games::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_game)
            .collect()
    }

    pub async fn active_attempts_remaining(&self) -> Result<Vec<i32>> {
        let attempts = Games::find()
            .select_only()
            .column(games::Column::AttemptsRemaining)
            .filter(games::Column::GameOver.eq(false))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(attempts)
    }

    /// Explain why a guarded write touched no rows.
    async fn missing_or_over(&self, id: Uuid) -> anyhow::Error {
        match Games::find_by_id(id).one(&self.db).await {
            Ok(Some(model)) if model.game_over => GameError::GameOver.into(),
            Ok(Some(_)) => anyhow!("Game {} changed concurrently", id),
            Ok(None) => GameError::game_not_found(id).into(),
            Err(err) => {
                warn!("Failed to reload game {}: {}", id, err);
                err.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::repositories::ScoreRepository;
    use hangman_core::{MoveOutcome, ScoreQuery};
    use migration::{Migrator, MigratorTrait};

    struct TestDb {
        users: UserRepository,
        games: GameRepository,
        scores: ScoreRepository,
    }

    async fn setup_test_db() -> TestDb {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        TestDb {
            users: UserRepository::new(db.clone()),
            games: GameRepository::new(db.clone()),
            scores: ScoreRepository::new(db),
        }
    }

    async fn stored_game(test_db: &TestDb, user: &str, word: &str, attempts: i32) -> Game {
        if test_db.users.find_by_name(user).await.unwrap().is_none() {
            test_db.users.create_user(user, None).await.unwrap();
        }
        let game = Game::new(Uuid::new_v4(), user.to_string(), word.to_string(), attempts);
        test_db.games.insert_game(&game).await.unwrap();
        game
    }

    async fn play_and_store(test_db: &TestDb, game: &mut Game, guess: &str) -> MoveOutcome {
        let outcome = game.apply_guess(guess).unwrap();
        match outcome.completion() {
            Some(completion) => {
                test_db.games.complete_game(game, completion).await.unwrap();
            }
            None => test_db.games.save_progress(game).await.unwrap(),
        }
        outcome
    }

    #[tokio::test]
    async fn test_insert_and_load_round_trip() {
        let test_db = setup_test_db().await;
        let mut game = stored_game(&test_db, "alice", "biscuits", 13).await;

        play_and_store(&test_db, &mut game, "s").await;
        play_and_store(&test_db, &mut game, "q").await;

        let loaded = test_db.games.find_by_id(game.id).await.unwrap().unwrap();
        assert_eq!(loaded, game);
        assert_eq!(loaded.guessed_word, "__s____s");
        assert_eq!(loaded.history, vec!['s', 'q']);
        assert_eq!(loaded.attempts_remaining, 12);
    }

    #[tokio::test]
    async fn test_find_missing_game() {
        let test_db = setup_test_db().await;
        assert!(test_db.games.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_loss_updates_user_and_score_together() {
        let test_db = setup_test_db().await;
        let mut game = stored_game(&test_db, "dana", "dog", 1).await;

        let outcome = play_and_store(&test_db, &mut game, "x").await;
        assert!(matches!(outcome, MoveOutcome::Lost(_)));

        let stored = test_db.games.find_by_id(game.id).await.unwrap().unwrap();
        assert!(stored.game_over);
        assert_eq!(stored.attempts_remaining, 0);

        let user = test_db.users.find_by_name("dana").await.unwrap().unwrap();
        assert_eq!(user.total_games, 1);
        assert_eq!(user.wins, 0);

        let scores = test_db.scores.query(&ScoreQuery::for_user("dana")).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert!(!scores[0].won);
        assert_eq!(scores[0].guesses, 1);
        assert_eq!(scores[0].game_id, game.id);
    }

    #[tokio::test]
    async fn test_win_updates_user_and_score() {
        let test_db = setup_test_db().await;
        let mut game = stored_game(&test_db, "carl", "cat", 13).await;

        for guess in ["c", "a"] {
            play_and_store(&test_db, &mut game, guess).await;
        }
        let outcome = play_and_store(&test_db, &mut game, "t").await;
        assert!(matches!(outcome, MoveOutcome::Won(_)));

        let user = test_db.users.find_by_name("carl").await.unwrap().unwrap();
        assert_eq!((user.wins, user.total_games), (1, 1));

        let scores = test_db.scores.query(&ScoreQuery::all()).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert!(scores[0].won);
        assert_eq!(scores[0].guesses, 0);
    }

    #[tokio::test]
    async fn test_second_completion_is_rejected_without_side_effects() {
        let test_db = setup_test_db().await;
        let mut game = stored_game(&test_db, "dana", "dog", 1).await;
        let stale = game.clone();

        let outcome = play_and_store(&test_db, &mut game, "x").await;
        let completion = outcome.completion().unwrap().clone();

        // A racing copy of the same game reaching a terminal state a second time
        let mut racer = stale;
        let racer_outcome = racer.apply_guess("y").unwrap();
        let err = test_db
            .games
            .complete_game(&racer, racer_outcome.completion().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<GameError>(), Some(&GameError::GameOver));

        let err = test_db.games.complete_game(&game, &completion).await.unwrap_err();
        assert_eq!(err.downcast_ref::<GameError>(), Some(&GameError::GameOver));

        let user = test_db.users.find_by_name("dana").await.unwrap().unwrap();
        assert_eq!(user.total_games, 1);
        assert_eq!(test_db.scores.query(&ScoreQuery::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_completion_rolls_back_game_row() {
        let test_db = setup_test_db().await;
        let mut game = stored_game(&test_db, "erin", "dog", 1).await;
        let outcome = game.apply_guess("x").unwrap();

        // Point the hand-off at a user that does not exist so the counter update fails
        let mut completion = outcome.completion().unwrap().clone();
        completion.user_name = "ghost".to_string();

        let err = test_db.games.complete_game(&game, &completion).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<GameError>(),
            Some(&GameError::user_not_found("ghost"))
        );

        let stored = test_db.games.find_by_id(game.id).await.unwrap().unwrap();
        assert!(!stored.game_over);
        assert_eq!(stored.attempts_remaining, 1);
        assert!(test_db.scores.query(&ScoreQuery::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_only_in_progress() {
        let test_db = setup_test_db().await;
        let active = stored_game(&test_db, "fred", "cat", 13).await;
        let mut finished = stored_game(&test_db, "fred", "dog", 1).await;
        play_and_store(&test_db, &mut finished, "x").await;

        test_db.games.delete_active_game(active.id).await.unwrap();
        assert!(test_db.games.find_by_id(active.id).await.unwrap().is_none());

        let err = test_db.games.delete_active_game(finished.id).await.unwrap_err();
        assert_eq!(err.downcast_ref::<GameError>(), Some(&GameError::GameOver));

        let err = test_db.games.delete_active_game(active.id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::GameNotFound { .. })
        ));

        // Cancelling left the finished game's single score as the only one
        let scores = test_db.scores.query(&ScoreQuery::for_user("fred")).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].game_id, finished.id);
    }

    #[tokio::test]
    async fn test_save_progress_on_finished_game_is_rejected() {
        let test_db = setup_test_db().await;
        let mut game = stored_game(&test_db, "gina", "dog", 1).await;
        let stale = game.clone();
        play_and_store(&test_db, &mut game, "x").await;

        let err = test_db.games.save_progress(&stale).await.unwrap_err();
        assert_eq!(err.downcast_ref::<GameError>(), Some(&GameError::GameOver));
    }

    #[tokio::test]
    async fn test_active_games_and_attempts() {
        let test_db = setup_test_db().await;
        let mut first = stored_game(&test_db, "hana", "cat", 13).await;
        let _second = stored_game(&test_db, "hana", "dog", 13).await;
        let mut done = stored_game(&test_db, "hana", "bat", 1).await;
        let _other = stored_game(&test_db, "ivan", "dosa", 10).await;

        play_and_store(&test_db, &mut first, "z").await;
        play_and_store(&test_db, &mut done, "z").await;

        let active = test_db.games.active_games_for_user("hana").await.unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|g| !g.game_over));

        let mut attempts = test_db.games.active_attempts_remaining().await.unwrap();
        attempts.sort();
        assert_eq!(attempts, vec![10, 12, 13]);
    }
}
