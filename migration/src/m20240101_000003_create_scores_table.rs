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
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // One score per finished game
                    .col(ColumnDef::new(Scores::GameId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Scores::UserName).string().not_null())
                    .col(ColumnDef::new(Scores::Date).date().not_null())
                    .col(ColumnDef::new(Scores::Won).boolean().not_null())
                    .col(ColumnDef::new(Scores::Guesses).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_user_name")
                            .from(Scores::Table, Scores::UserName)
                            .to(Users::Table, Users::Name),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scores_guesses")
                    .table(Scores::Table)
                    .col(Scores::Guesses)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scores_user_name")
                    .table(Scores::Table)
                    .col(Scores::UserName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Scores {
    Table,
    Id,
    GameId,
    UserName,
    Date,
    Won,
    Guesses,
}
