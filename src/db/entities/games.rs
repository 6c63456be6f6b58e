//! SeaORM entity for a published game.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub category: GameCategory,
    pub title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,

    pub location_name: String,
    pub location_address: Option<String>,
    pub location_lat: f64,
    pub location_lng: f64,
    pub location_notes: Option<String>,

    pub start_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub max_participants: i32,

    pub pricing_type: PricingType,
    pub pricing_amount_cents: i64,
    pub pricing_currency: String,

    pub signup_deadline: DateTime<Utc>,
    pub drop_deadline: Option<DateTime<Utc>>,
    pub skill_level: SkillLevel,

    pub status: GameStatus,
    pub cancelled_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
    #[sea_orm(has_many = "super::teams::Entity")]
    Teams,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `start_at + duration_minutes`, the instant a game stops accepting
    /// joins and can no longer be cancelled.
    pub fn end_at(&self) -> DateTime<Utc> {
        self.start_at + chrono::Duration::minutes(self.duration_minutes as i64)
    }

    /// Presentation-layer status (spec.md §4.3 "Derived game status"):
    /// cancelled/completed/in_progress/full/open are computed from the
    /// clock and the current confirmed count rather than stored, taking
    /// precedence in that order over the persisted `status` column.
    pub fn derived_status(&self, now: DateTime<Utc>, confirmed_count: i64) -> GameStatus {
        if self.cancelled_at.is_some() {
            GameStatus::Cancelled
        } else if now > self.end_at() {
            GameStatus::Completed
        } else if now >= self.start_at {
            GameStatus::InProgress
        } else if confirmed_count >= self.max_participants as i64 {
            GameStatus::Full
        } else {
            GameStatus::Open
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    #[sea_orm(string_value = "soccer")]
    Soccer,
    #[sea_orm(string_value = "basketball")]
    Basketball,
    #[sea_orm(string_value = "pickleball")]
    Pickleball,
    #[sea_orm(string_value = "flag_football")]
    FlagFootball,
    #[sea_orm(string_value = "volleyball")]
    Volleyball,
    #[sea_orm(string_value = "ultimate_frisbee")]
    UltimateFrisbee,
    #[sea_orm(string_value = "tennis")]
    Tennis,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    #[sea_orm(string_value = "free")]
    Free,
    #[sea_orm(string_value = "total")]
    Total,
    #[sea_orm(string_value = "per_person")]
    PerPerson,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    #[sea_orm(string_value = "beginner")]
    Beginner,
    #[sea_orm(string_value = "intermediate")]
    Intermediate,
    #[sea_orm(string_value = "advanced")]
    Advanced,
    #[default]
    #[sea_orm(string_value = "all")]
    All,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "full")]
    Full,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}
