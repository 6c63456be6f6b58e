//! SeaORM entity for a registered user.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Stored lower-case; uniqueness is case-insensitive per the data model.
    #[sea_orm(unique)]
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    /// Argon2 password hash. Never serialized back to a client.
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::games::Entity")]
    OwnedGames,
    #[sea_orm(has_many = "super::participants::Entity")]
    Participations,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnedGames.def()
    }
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.to_lowercase()))
            .one(db)
            .await
    }

    pub async fn by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        email: String,
        given_name: String,
        family_name: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            email: Set(email.to_lowercase()),
            given_name: Set(given_name),
            family_name: Set(family_name),
            password_hash: Set(password_hash),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
