//! Discord servers the companion bot has joined, and their bot settings

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A Discord guild known to the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub id: Snowflake,
    pub discord_server_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub owner_discord_id: Option<String>,
    pub member_count: i32,
    pub bot_joined_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Server {
    #[inline]
    pub fn is_owned_by(&self, discord_user_id: &str) -> bool {
        self.owner_discord_id.as_deref() == Some(discord_user_id)
    }

    pub fn icon_url(&self) -> Option<String> {
        self.icon.as_ref().map(|hash| {
            format!(
                "https://cdn.discordapp.com/icons/{}/{hash}.png",
                self.discord_server_id
            )
        })
    }
}

/// Per-server bot behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub id: Snowflake,
    pub server_id: Snowflake,
    pub create_brand_roles: bool,
    pub create_type_roles: bool,
    pub create_model_roles: bool,
    /// Empty when no story feed channel is selected
    pub story_feed_channel_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable part of a [`ServerConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfigUpdate {
    pub create_brand_roles: bool,
    pub create_type_roles: bool,
    pub create_model_roles: bool,
    pub story_feed_channel_id: String,
}

impl ServerConfig {
    /// All flags off, no story feed
    pub fn default_for(id: Snowflake, server_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            server_id,
            create_brand_roles: false,
            create_type_roles: false,
            create_model_roles: false,
            story_feed_channel_id: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit; `created_at` is untouched and `updated_at` always advances
    pub fn apply(&mut self, update: ServerConfigUpdate) {
        self.create_brand_roles = update.create_brand_roles;
        self.create_type_roles = update.create_type_roles;
        self.create_model_roles = update.create_model_roles;
        self.story_feed_channel_id = update.story_feed_channel_id.trim().to_string();
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }

    #[inline]
    pub fn has_story_feed(&self) -> bool {
        !self.story_feed_channel_id.is_empty()
    }
}
