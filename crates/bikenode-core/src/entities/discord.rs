//! Shapes returned by Discord and by the companion bot

use serde::{Deserialize, Serialize};

/// `GET /users/@me` payload (only the fields we store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens obtained from the OAuth2 code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Result of a completed OAuth2 code exchange
#[derive(Debug, Clone)]
pub struct DiscordLogin {
    pub tokens: DiscordTokens,
    pub profile: DiscordProfile,
}

/// A channel as listed by the bot API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerChannel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub position: i32,
}

impl ServerChannel {
    pub const GUILD_TEXT: u8 = 0;
    pub const GUILD_ANNOUNCEMENT: u8 = 5;

    /// Channels a story feed can be posted into
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, Self::GUILD_TEXT | Self::GUILD_ANNOUNCEMENT)
    }
}
