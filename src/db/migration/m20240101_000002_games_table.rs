use sea_orm_migration::{prelude::*, schema::*};

use super::m20240101_000001_users_table::Users;

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
                    .col(pk_auto(Games::Id))
                    .col(integer(Games::OwnerId))
                    .col(string(Games::Category))
                    .col(string_null(Games::Title))
                    .col(string_null(Games::Description))
                    .col(string_null(Games::Notes))
                    .col(string(Games::LocationName))
                    .col(string_null(Games::LocationAddress))
                    .col(double(Games::LocationLat))
                    .col(double(Games::LocationLng))
                    .col(string_null(Games::LocationNotes))
                    .col(date_time(Games::StartAt))
                    .col(integer(Games::DurationMinutes))
                    .col(integer(Games::MaxParticipants))
                    .col(string(Games::PricingType))
                    .col(big_integer(Games::PricingAmountCents))
                    .col(string(Games::PricingCurrency))
                    .col(date_time(Games::SignupDeadline))
                    .col(date_time_null(Games::DropDeadline))
                    .col(string(Games::SkillLevel))
                    .col(string(Games::Status))
                    .col(date_time_null(Games::CancelledAt))
                    .col(date_time(Games::CreatedAt))
                    .col(date_time(Games::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Games::Table, Games::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-games-start-at-open")
                    .table(Games::Table)
                    .col(Games::StartAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-games-category-status")
                    .table(Games::Table)
                    .col(Games::Category)
                    .col(Games::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-games-owner")
                    .table(Games::Table)
                    .col(Games::OwnerId)
                    .to_owned(),
            )
            .await
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
    OwnerId,
    Category,
    Title,
    Description,
    Notes,
    LocationName,
    LocationAddress,
    LocationLat,
    LocationLng,
    LocationNotes,
    StartAt,
    DurationMinutes,
    MaxParticipants,
    PricingType,
    PricingAmountCents,
    PricingCurrency,
    SignupDeadline,
    DropDeadline,
    SkillLevel,
    Status,
    CancelledAt,
    CreatedAt,
    UpdatedAt,
}
