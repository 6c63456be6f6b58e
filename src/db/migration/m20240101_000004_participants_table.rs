use sea_orm_migration::{prelude::*, schema::*};

use super::{m20240101_000002_games_table::Games, m20240101_000003_teams_table::Teams};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(pk_auto(Participants::Id))
                    .col(integer(Participants::GameId))
                    .col(integer(Participants::UserId))
                    .col(integer_null(Participants::TeamId))
                    .col(string(Participants::Status))
                    .col(boolean(Participants::Paid))
                    .col(big_integer_null(Participants::PaidAmountCents))
                    .col(string_null(Participants::Notes))
                    .col(date_time(Participants::JoinedAt))
                    .col(date_time(Participants::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Participants::Table, Participants::GameId)
                            .to(Games::Table, Games::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Participants::Table, Participants::TeamId)
                            .to(Teams::Table, Teams::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-participants-game-user-unique")
                    .table(Participants::Table)
                    .col(Participants::GameId)
                    .col(Participants::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-participants-game-status")
                    .table(Participants::Table)
                    .col(Participants::GameId)
                    .col(Participants::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-participants-user")
                    .table(Participants::Table)
                    .col(Participants::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Participants {
    Table,
    Id,
    GameId,
    UserId,
    TeamId,
    Status,
    Paid,
    PaidAmountCents,
    Notes,
    JoinedAt,
    UpdatedAt,
}
