pub mod connection;
pub mod entities;
pub mod repositories;

use sea_orm::DatabaseConnection;

use repositories::{GameRepository, ScoreRepository, UserRepository};

/// The three repositories sharing one connection pool.
pub struct Repositories {
    pub users: UserRepository,
    pub games: GameRepository,
    pub scores: ScoreRepository,
}

impl Repositories {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(connection.clone()),
            games: GameRepository::new(connection.clone()),
            scores: ScoreRepository::new(connection),
        }
    }
}
