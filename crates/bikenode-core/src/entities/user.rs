//! User entity - a person who signed in through Discord

use chrono::{DateTime, Utc};

use super::discord::{DiscordProfile, DiscordTokens};
use crate::value_objects::Snowflake;

const DISCORD_CDN: &str = "https://cdn.discordapp.com";

/// Local account mirroring a Discord identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
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

impl User {
    /// Build a brand-new user from a Discord login
    pub fn from_discord(id: Snowflake, profile: &DiscordProfile, tokens: &DiscordTokens) -> Self {
        let now = Utc::now();
        Self {
            id,
            discord_id: profile.id.clone(),
            username: profile.username.clone(),
            discriminator: profile.discriminator.clone(),
            avatar: profile.avatar.clone(),
            email: profile.email.clone(),
            access_token: Some(tokens.access_token.clone()),
            refresh_token: tokens.refresh_token.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable profile fields from a fresh Discord login
    pub fn apply_login(&mut self, profile: &DiscordProfile, tokens: &DiscordTokens) {
        self.username.clone_from(&profile.username);
        self.discriminator.clone_from(&profile.discriminator);
        self.avatar.clone_from(&profile.avatar);
        self.email.clone_from(&profile.email);
        self.access_token = Some(tokens.access_token.clone());
        self.refresh_token.clone_from(&tokens.refresh_token);
        self.updated_at = Utc::now();
    }

    /// `username#1234` for legacy accounts, plain username otherwise
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }

    /// Discord CDN avatar, falling back to the default embed avatar
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => format!("{DISCORD_CDN}/avatars/{}/{hash}.png", self.discord_id),
            None => {
                let index = self
                    .discord_id
                    .parse::<u64>()
                    .map_or(0, |id| (id >> 22) % 6);
                format!("{DISCORD_CDN}/embed/avatars/{index}.png")
            }
        }
    }
}
