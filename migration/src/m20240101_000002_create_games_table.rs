use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::UserName).string().not_null())
                    .col(ColumnDef::new(Games::Target).string().not_null())
                    .col(ColumnDef::new(Games::GuessedWord).string().not_null())
                    .col(
                        ColumnDef::new(Games::LettersGuessed)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Games::CorrectLetters)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Games::AttemptsAllowed)
                            .integer()
                            .not_null()
                            .default(13),
                    )
                    .col(
                        ColumnDef::new(Games::AttemptsRemaining)
                            .integer()
                            .not_null()
                            .default(13),
                    )
                    .col(
                        ColumnDef::new(Games::GameOver)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Games::History).text().not_null().default("[]"))
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_user_name")
                            .from(Games::Table, Games::UserName)
                            .to(Users::Table, Users::Name),
                    )
                    .to_owned(),
            )
            .await?;

        // Per-user game listing and the in-progress average both filter on these
        manager
            .create_index(
                Index::create()
                    .name("idx_games_user_name_game_over")
                    .table(Games::Table)
                    .col(Games::UserName)
                    .col(Games::GameOver)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Games {
    Table,
    Id,
    UserName,
    Target,
    GuessedWord,
    LettersGuessed,
    CorrectLetters,
    AttemptsAllowed,
    AttemptsRemaining,
    GameOver,
    History,
    CreatedAt,
    UpdatedAt,
}
