//! Server configuration service
//!
//! Per-server bot settings, gated on Discord admin rights derived from the
//! server owner and the cached role permissions. Saved changes are pushed to
//! the bot; a failed push is reported, never rolled back.

use bikenode_core::entities::{Server, ServerConfig, ServerConfigUpdate, User, UserRole};
use bikenode_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    ChannelListResponse, ChannelResponse, NotificationStatus, ServerConfigResponse,
    ServerConfigUpdateResponse, UpdateServerConfigRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Owner of the server, or holder of a role with ADMINISTRATOR / MANAGE_GUILD
pub(crate) fn grants_admin<'r>(
    server: &Server,
    user: &User,
    roles: impl IntoIterator<Item = &'r UserRole>,
) -> bool {
    server.is_owned_by(&user.discord_id)
        || roles
            .into_iter()
            .any(|r| r.server_id == server.id && r.permissions.grants_server_admin())
}

/// Server configuration service
pub struct ServerConfigService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ServerConfigService<'a> {
    /// Create a new ServerConfigService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn resolve_server(&self, discord_server_id: &str) -> ServiceResult<Server> {
        Ok(self
            .ctx
            .server_repo()
            .find_by_discord_id(discord_server_id)
            .await?
            .ok_or_else(|| DomainError::ServerNotFound(discord_server_id.to_string()))?)
    }

    async fn is_admin_of(&self, server: &Server, user_id: Snowflake) -> ServiceResult<bool> {
        let Some(user) = self.ctx.user_repo().find_by_id(user_id).await? else {
            return Ok(false);
        };
        if server.is_owned_by(&user.discord_id) {
            return Ok(true);
        }
        let roles = self
            .ctx
            .role_repo()
            .list_by_user_and_server(user_id, server.id)
            .await?;
        Ok(grants_admin(server, &user, &roles))
    }

    /// Resolve the server and insist the user administers it
    async fn require_admin(
        &self,
        discord_server_id: &str,
        user_id: Snowflake,
    ) -> ServiceResult<Server> {
        let server = self.resolve_server(discord_server_id).await?;
        if !self.is_admin_of(&server, user_id).await? {
            warn!(user_id = %user_id, server = %discord_server_id, "Non-admin config access");
            return Err(DomainError::NotServerAdmin(discord_server_id.to_string()).into());
        }
        Ok(server)
    }

    /// Stored config, or a freshly persisted all-defaults row
    async fn load_or_create(&self, server_id: Snowflake) -> ServiceResult<ServerConfig> {
        if let Some(config) = self.ctx.server_config_repo().find_by_server(server_id).await? {
            return Ok(config);
        }
        let defaults = ServerConfig::default_for(self.ctx.generate_id(), server_id);
        // a concurrent first view may win; either way we get the stored row
        let stored = self.ctx.server_config_repo().insert_if_absent(&defaults).await?;
        info!(server_id = %server_id, "Default server config created");
        Ok(stored)
    }

    /// Whether the user may manage this server's bot settings
    #[instrument(skip(self))]
    pub async fn is_user_server_admin(
        &self,
        discord_server_id: &str,
        user_id: Snowflake,
    ) -> ServiceResult<bool> {
        let server = self.resolve_server(discord_server_id).await?;
        self.is_admin_of(&server, user_id).await
    }

    /// View the config, creating the default row on first access
    #[instrument(skip(self))]
    pub async fn get_config(
        &self,
        discord_server_id: &str,
        user_id: Snowflake,
    ) -> ServiceResult<ServerConfigResponse> {
        let server = self.require_admin(discord_server_id, user_id).await?;
        let config = self.load_or_create(server.id).await?;
        Ok(ServerConfigResponse::from(&config))
    }

    /// Save the config, then tell the bot
    #[instrument(skip(self, request))]
    pub async fn update_config(
        &self,
        discord_server_id: &str,
        user_id: Snowflake,
        request: UpdateServerConfigRequest,
    ) -> ServiceResult<ServerConfigUpdateResponse> {
        let server = self.require_admin(discord_server_id, user_id).await?;
        let mut config = self.load_or_create(server.id).await?;

        config.apply(ServerConfigUpdate {
            create_brand_roles: request.create_brand_roles,
            create_type_roles: request.create_type_roles,
            create_model_roles: request.create_model_roles,
            story_feed_channel_id: request.story_feed_channel_id.trim().to_string(),
        });
        let saved = self.ctx.server_config_repo().upsert(&config).await?;

        info!(
            server = %discord_server_id,
            brand = saved.create_brand_roles,
            kind = saved.create_type_roles,
            model = saved.create_model_roles,
            story_feed = saved.has_story_feed(),
            "Server config saved"
        );

        let notification = match self
            .ctx
            .bot_api()
            .notify_config_changed(&server.discord_server_id, &saved)
            .await
        {
            Ok(()) => NotificationStatus::delivered(),
            Err(e) => {
                warn!(server = %discord_server_id, error = %e, "Bot notification failed");
                NotificationStatus::failed(e.to_string())
            }
        };

        Ok(ServerConfigUpdateResponse {
            config: ServerConfigResponse::from(&saved),
            notification,
        })
    }

    /// Text-capable channels, as reported by the bot
    #[instrument(skip(self))]
    pub async fn list_channels(
        &self,
        discord_server_id: &str,
        user_id: Snowflake,
    ) -> ServiceResult<ChannelListResponse> {
        let server = self.require_admin(discord_server_id, user_id).await?;
        let mut channels: Vec<_> = self
            .ctx
            .bot_api()
            .list_channels(&server.discord_server_id)
            .await
            .inspect_err(|e| warn!(server = %discord_server_id, error = %e, "Channel listing failed"))?
            .into_iter()
            .filter(|c| c.is_text())
            .collect();
        channels.sort_by_key(|c| c.position);

        Ok(ChannelListResponse {
            channels: channels.into_iter().map(ChannelResponse::from).collect(),
        })
    }
}
