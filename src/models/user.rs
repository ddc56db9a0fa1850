use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Forum membership levels, stored as lowercase strings.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "premium")]
    Premium,
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "guest")]
    Guest,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sea_orm(unique)]
    pub email: String,
    pub registration_date: DateTime,
    pub last_login_date: Option<DateTime>,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub points: i32,
    pub bio: Option<String>,
    pub is_banned: bool,
    /// Bumped on every edit; writes are filtered on the version they read.
    pub row_version: i32,
}

// Topics, messages and articles reference users from their side; the
// collections the user "owns" are derived by query, not stored here.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
