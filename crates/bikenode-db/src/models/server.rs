//! Server and server config models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ServerModel {
    pub id: i64,
    pub discord_server_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub owner_discord_id: Option<String>,
    pub member_count: i32,
    pub bot_joined_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ServerConfigModel {
    pub id: i64,
    pub server_id: i64,
    pub create_brand_roles: bool,
    pub create_type_roles: bool,
    pub create_model_roles: bool,
    pub story_feed_channel_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
