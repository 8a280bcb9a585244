//! Cached role and visibility models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for user_roles table
#[derive(Debug, Clone, FromRow)]
pub struct UserRoleModel {
    pub id: i64,
    pub user_id: i64,
    pub server_id: i64,
    pub role_id: String,
    pub role_name: String,
    pub role_color: i32,
    /// Discord permission bitfield
    pub permissions: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct VisibilityModel {
    pub user_id: i64,
    pub server_id: i64,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
