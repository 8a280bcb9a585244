//! Cached Discord roles and per-server profile visibility

use chrono::{DateTime, Utc};

use crate::value_objects::{Permissions, Snowflake};

/// A Discord role held by a user on one server
///
/// Populated from Discord by the bot; never authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRole {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub server_id: Snowflake,
    pub role_id: String,
    pub role_name: String,
    pub role_color: i32,
    pub permissions: Permissions,
}

impl UserRole {
    /// `#rrggbb`, or `None` for Discord's "no color" (0)
    pub fn color_hex(&self) -> Option<String> {
        (self.role_color > 0).then(|| format!("#{:06x}", self.role_color & 0x00FF_FFFF))
    }
}

/// Whether a user's profile shows up in a server's context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerVisibility {
    pub user_id: Snowflake,
    pub server_id: Snowflake,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServerVisibility {
    pub fn new(user_id: Snowflake, server_id: Snowflake, is_visible: bool) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            server_id,
            is_visible,
            created_at: now,
            updated_at: now,
        }
    }
}
