//! Outbound ports to Discord and to the companion bot process

use async_trait::async_trait;

use crate::entities::{DiscordLogin, ServerChannel, ServerConfig};
use crate::error::UpstreamError;

/// Discord OAuth2 identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authorize URL for the given CSRF state. Pure; no I/O.
    fn authorization_url(&self, state: &str) -> String;

    /// Trade an authorization code for tokens, then fetch the profile.
    /// Either step failing aborts the whole exchange.
    async fn exchange_code(&self, code: &str) -> Result<DiscordLogin, UpstreamError>;
}

/// HTTP control surface of the Discord bot
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Every channel of the server, unfiltered
    async fn list_channels(&self, discord_server_id: &str)
        -> Result<Vec<ServerChannel>, UpstreamError>;

    /// Tell the bot a server's configuration changed
    async fn notify_config_changed(
        &self,
        discord_server_id: &str,
        config: &ServerConfig,
    ) -> Result<(), UpstreamError>;
}
