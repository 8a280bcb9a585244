//! Server listing and per-user visibility

use std::collections::{HashMap, HashSet};

use bikenode_core::entities::ServerVisibility;
use bikenode_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{UserServerResponse, VisibilityResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::server_config::grants_admin;

/// Servers with no visibility row are shown
const DEFAULT_VISIBLE: bool = true;

/// Local ids of the servers `user_id` is linked to. Links come from Discord
/// data cached elsewhere; nothing here creates one.
pub(crate) async fn linked_server_ids(
    ctx: &ServiceContext,
    user_id: Snowflake,
) -> ServiceResult<HashSet<Snowflake>> {
    let servers = ctx.server_repo().list_for_user(user_id).await?;
    Ok(servers.into_iter().map(|s| s.id).collect())
}

/// Server service
pub struct ServerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ServerService<'a> {
    /// Create a new ServerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every server the user is linked to, with visibility and admin flag
    #[instrument(skip(self))]
    pub async fn list_user_servers(
        &self,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<UserServerResponse>> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let servers = self.ctx.server_repo().list_for_user(user_id).await?;
        let roles = self.ctx.role_repo().list_by_user(user_id).await?;
        let visibility: HashMap<Snowflake, bool> = self
            .ctx
            .visibility_repo()
            .list_by_user(user_id)
            .await?
            .into_iter()
            .map(|v| (v.server_id, v.is_visible))
            .collect();

        Ok(servers
            .iter()
            .map(|server| {
                let is_visible = visibility
                    .get(&server.id)
                    .copied()
                    .unwrap_or(DEFAULT_VISIBLE);
                UserServerResponse::new(server, is_visible, grants_admin(server, &user, &roles))
            })
            .collect())
    }

    /// Show or hide a server on the user's profile. Only servers the user is
    /// already linked to can be toggled.
    #[instrument(skip(self))]
    pub async fn set_visibility(
        &self,
        user_id: Snowflake,
        discord_server_id: &str,
        is_visible: bool,
    ) -> ServiceResult<VisibilityResponse> {
        let server = self
            .ctx
            .server_repo()
            .find_by_discord_id(discord_server_id)
            .await?
            .ok_or_else(|| DomainError::ServerNotFound(discord_server_id.to_string()))?;

        if !linked_server_ids(self.ctx, user_id).await?.contains(&server.id) {
            return Err(DomainError::NotServerMember(discord_server_id.to_string()).into());
        }

        let stored = self
            .ctx
            .visibility_repo()
            .set(&ServerVisibility::new(user_id, server.id, is_visible))
            .await?;

        info!(user_id = %user_id, server = %discord_server_id, is_visible, "Visibility updated");
        Ok(VisibilityResponse::from(&stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{role, server, TestHarness};
    use bikenode_core::Permissions;

    #[tokio::test]
    async fn test_lists_linked_servers_with_flags() {
        let harness = TestHarness::new();
        let user = harness.seed_user("1", "rider");
        harness.db.add_server(server(70, "7000", "1"));
        harness.db.add_server(server(71, "7100", "99"));
        harness.db.add_server(server(72, "7200", "99"));
        harness.db.add_role(role(user.id, 71, Permissions::KICK_MEMBERS));

        let service = ServerService::new(&harness.ctx);
        service.set_visibility(user.id, "7000", false).await.unwrap();

        let servers = service.list_user_servers(user.id).await.unwrap();
        let summary: Vec<_> = servers
            .iter()
            .map(|s| (s.discord_server_id.as_str(), s.is_visible, s.is_admin))
            .collect();
        // 7000 as owner, 7100 via role; 7200 is not linked
        assert_eq!(summary, vec![("7000", false, true), ("7100", true, false)]);
    }

    #[tokio::test]
    async fn test_set_visibility_upserts() {
        let harness = TestHarness::new();
        let user = harness.seed_user("1", "rider");
        harness.db.add_server(server(70, "7000", "99"));
        harness.db.add_role(role(user.id, 70, Permissions::empty()));
        let service = ServerService::new(&harness.ctx);

        let hidden = service.set_visibility(user.id, "7000", false).await.unwrap();
        assert!(!hidden.is_visible);
        let shown = service.set_visibility(user.id, "7000", true).await.unwrap();
        assert!(shown.is_visible);
        assert_eq!(harness.db.visibility_count(), 1);
    }

    #[tokio::test]
    async fn test_set_visibility_unknown_server() {
        let harness = TestHarness::new();
        let user = harness.seed_user("1", "rider");
        let err = ServerService::new(&harness.ctx)
            .set_visibility(user.id, "404", true)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_SERVER");
    }

    #[tokio::test]
    async fn test_set_visibility_requires_link() {
        let harness = TestHarness::new();
        let user = harness.seed_user("1", "rider");
        harness.db.add_server(server(80, "8000", "99"));
        let service = ServerService::new(&harness.ctx);

        let err = service.set_visibility(user.id, "8000", true).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "NOT_SERVER_MEMBER");
        assert_eq!(harness.db.visibility_count(), 0);
        assert!(service.list_user_servers(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_existing_visibility_row_keeps_link() {
        let harness = TestHarness::new();
        let user = harness.seed_user("1", "rider");
        harness.db.add_server(server(80, "8000", "99"));
        harness
            .db
            .add_visibility(ServerVisibility::new(user.id, Snowflake::new(80), true));
        let service = ServerService::new(&harness.ctx);

        let hidden = service.set_visibility(user.id, "8000", false).await.unwrap();
        assert!(!hidden.is_visible);
        assert_eq!(harness.db.visibility_count(), 1);
    }
}
