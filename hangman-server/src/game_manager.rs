use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::metrics_cache::MetricsCache;
use hangman_core::{
    average_attempts_remaining, format_average_attempts, Game, MoveOutcome, ScoreQuery,
    ScoreRecord, UserRecord, WordBank, MOVES_REMAINING_KEY,
};
use hangman_persistence::Repositories;
use hangman_types::{GameError, GameId};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Entry point for every user and game operation.
///
/// Moves and cancellations on the same game are serialized through a per-game
/// lock held from load to persist. Different games never wait on each other.
pub struct GameManager {
    repositories: Arc<Repositories>,
    word_bank: WordBank,
    attempts_allowed: i32,
    metrics_cache: Arc<MetricsCache>,
    game_locks: DashMap<GameId, Arc<Mutex<()>>>,
}

impl GameManager {
    pub fn new(repositories: Repositories, word_bank: WordBank, attempts_allowed: i32) -> Self {
        Self {
            repositories: Arc::new(repositories),
            word_bank,
            attempts_allowed,
            metrics_cache: Arc::new(MetricsCache::new()),
            game_locks: DashMap::new(),
        }
    }

    async fn lock_game(&self, game_id: GameId) -> OwnedMutexGuard<()> {
        let lock = self.game_locks.entry(game_id).or_default().clone();
        lock.lock_owned().await
    }

    // Once a game is over or deleted it is never mutated again, so its lock can go
    fn release_game(&self, game_id: GameId) {
        self.game_locks.remove(&game_id);
    }

    /// Drop locks nobody is holding or waiting on, returning how many went.
    ///
    /// Games abandoned mid-play never reach `release_game`. A held or awaited
    /// lock keeps an extra `Arc` alive, so it always survives the prune.
    pub fn prune_idle_game_locks(&self) -> usize {
        let before = self.game_locks.len();
        self.game_locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        let pruned = before.saturating_sub(self.game_locks.len());
        if pruned > 0 {
            debug!("Pruned {} idle game locks", pruned);
        }
        pruned
    }

    pub fn game_lock_count(&self) -> usize {
        self.game_locks.len()
    }

    fn release_if_settled(&self, game_id: GameId, err: &ServiceError) {
        if matches!(
            err,
            ServiceError::Game(GameError::GameNotFound { .. } | GameError::GameOver)
        ) {
            self.release_game(game_id);
        }
    }

    async fn require_user(&self, user_name: &str) -> ServiceResult<UserRecord> {
        self.repositories
            .users
            .find_by_name(user_name)
            .await?
            .ok_or_else(|| GameError::user_not_found(user_name).into())
    }

    pub async fn create_user(
        &self,
        user_name: &str,
        email: Option<String>,
    ) -> ServiceResult<UserRecord> {
        Ok(self.repositories.users.create_user(user_name, email).await?)
    }

    pub async fn create_game(&self, user_name: &str) -> ServiceResult<Game> {
        let user = self.require_user(user_name).await?;
        let game = Game::create(&user.name, &self.word_bank, self.attempts_allowed);
        self.repositories.games.insert_game(&game).await?;

        // The creating request does not wait for the average to be refreshed
        self.schedule_average_refresh();
        Ok(game)
    }

    pub async fn get_game(&self, game_id: GameId) -> ServiceResult<Game> {
        self.repositories
            .games
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| GameError::game_not_found(game_id).into())
    }

    /// Apply one guess and persist the result. A game-ending guess writes the
    /// game, the owner's counters and the score in one transaction.
    pub async fn make_move(
        &self,
        game_id: GameId,
        guess: &str,
    ) -> ServiceResult<(Game, MoveOutcome)> {
        let _guard = self.lock_game(game_id).await;

        let mut game = self
            .get_game(game_id)
            .await
            .inspect_err(|err| self.release_if_settled(game_id, err))?;
        let outcome = game
            .apply_guess(guess)
            .map_err(ServiceError::from)
            .inspect_err(|err| self.release_if_settled(game_id, err))?;

        match outcome.completion() {
            Some(completion) => {
                self.repositories.games.complete_game(&game, completion).await?;
                self.release_game(game_id);
            }
            None => self.repositories.games.save_progress(&game).await?,
        }

        debug!("Game {} accepted guess {:?}: {}", game_id, guess, outcome.message());
        Ok((game, outcome))
    }

    pub async fn cancel_game(&self, game_id: GameId) -> ServiceResult<()> {
        let _guard = self.lock_game(game_id).await;
        self.repositories
            .games
            .delete_active_game(game_id)
            .await
            .map_err(ServiceError::from)
            .inspect_err(|err| self.release_if_settled(game_id, err))?;
        self.release_game(game_id);
        Ok(())
    }

    pub async fn game_history(&self, game_id: GameId) -> ServiceResult<Vec<char>> {
        Ok(self.get_game(game_id).await?.history)
    }

    /// In-progress games owned by `user_name`.
    pub async fn list_user_games(&self, user_name: &str) -> ServiceResult<Vec<Game>> {
        self.require_user(user_name).await?;
        Ok(self
            .repositories
            .games
            .active_games_for_user(user_name)
            .await?)
    }

    pub async fn list_all_scores(&self) -> ServiceResult<Vec<ScoreRecord>> {
        Ok(self.repositories.scores.query(&ScoreQuery::all()).await?)
    }

    pub async fn list_user_scores(&self, user_name: &str) -> ServiceResult<Vec<ScoreRecord>> {
        self.require_user(user_name).await?;
        Ok(self
            .repositories
            .scores
            .query(&ScoreQuery::for_user(user_name))
            .await?)
    }

    /// Fewest guesses first. Losses are ranked alongside wins.
    pub async fn list_high_scores(&self, limit: Option<u64>) -> ServiceResult<Vec<ScoreRecord>> {
        Ok(self
            .repositories
            .scores
            .query(&ScoreQuery::high_scores(limit))
            .await?)
    }

    pub async fn rank_users(&self) -> ServiceResult<Vec<UserRecord>> {
        Ok(self.repositories.users.ranked_users().await?)
    }

    /// Last cached average message, if one has been computed.
    pub fn average_attempts_remaining(&self) -> Option<String> {
        self.metrics_cache.get(MOVES_REMAINING_KEY)
    }

    pub async fn recompute_average_attempts(&self) -> ServiceResult<Option<f64>> {
        Ok(refresh_average(&self.repositories, &self.metrics_cache).await?)
    }

    /// Fire-and-forget refresh of the cached average.
    pub fn schedule_average_refresh(&self) {
        let repositories = self.repositories.clone();
        let metrics_cache = self.metrics_cache.clone();
        tokio::spawn(async move {
            if let Err(err) = refresh_average(&repositories, &metrics_cache).await {
                warn!("Failed to refresh average attempts remaining: {}", err);
            }
        });
    }
}

async fn refresh_average(
    repositories: &Repositories,
    metrics_cache: &MetricsCache,
) -> anyhow::Result<Option<f64>> {
    let attempts = repositories.games.active_attempts_remaining().await?;
    let average = average_attempts_remaining(attempts);

    match average {
        Some(average) => {
            metrics_cache.set(MOVES_REMAINING_KEY, format_average_attempts(average));
            info!("Average attempts remaining is now {:.2}", average);
        }
        None => metrics_cache.remove(MOVES_REMAINING_KEY),
    }
    Ok(average)
}
