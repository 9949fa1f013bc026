use anyhow::Result;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, SqlErr,
};
use tracing::info;

use crate::entities::{prelude::*, users};
use hangman_core::{rank_users, UserRecord};
use hangman_types::GameError;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_user(model: users::Model) -> UserRecord {
        UserRecord {
            name: model.name,
            email: model.email,
            wins: model.wins,
            total_games: model.total_games,
        }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>> {
        let user_model = Users::find_by_id(name.to_string()).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    /// Register a new user. Fails with `GameError::DuplicateName` if the name is taken.
    pub async fn create_user(&self, name: &str, email: Option<String>) -> Result<UserRecord> {
        if self.find_by_name(name).await?.is_some() {
            return Err(GameError::DuplicateName {
                name: name.to_string(),
            }
            .into());
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let user = UserRecord::new(name, email);
        let user_model = users::ActiveModel {
            name: ActiveValue::Set(user.name.clone()),
            email: ActiveValue::Set(user.email.clone()),
            wins: ActiveValue::Set(user.wins),
            total_games: ActiveValue::Set(user.total_games),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        // A concurrent registration can still win the race between the check and the insert
        let inserted = Users::insert(user_model)
            .exec_without_returning(&self.db)
            .await;
        if let Err(err) = inserted {
            if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
                return Err(GameError::DuplicateName {
                    name: name.to_string(),
                }
                .into());
            }
            return Err(err.into());
        }

        info!("Registered user {}", user.name);
        Ok(user)
    }

    /// Users with at least one finished game, best win percentage first.
    /// Ties keep registration order.
    pub async fn ranked_users(&self) -> Result<Vec<UserRecord>> {
        let users = Users::find()
            .filter(users::Column::TotalGames.gt(0))
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Name)
            .all(&self.db)
            .await?;

        Ok(rank_users(
            users.into_iter().map(Self::model_to_user).collect(),
        ))
    }
}
