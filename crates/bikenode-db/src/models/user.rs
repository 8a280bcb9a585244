//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub discord_id: String,
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row returned by the login upsert; `inserted` is `xmax = 0`
#[derive(Debug, Clone, FromRow)]
pub struct UpsertedUserModel {
    #[sqlx(flatten)]
    pub user: UserModel,
    pub inserted: bool,
}
