//! PostgreSQL implementation of ServerRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bikenode_core::entities::Server;
use bikenode_core::traits::{RepoResult, ServerRepository};
use bikenode_core::value_objects::Snowflake;

use crate::models::ServerModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgServerRepository {
    pool: PgPool,
}

impl PgServerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServerRepository for PgServerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Server>> {
        let result = sqlx::query_as::<_, ServerModel>(
            r"
            SELECT id, discord_server_id, name, icon, owner_discord_id, member_count,
                   bot_joined_at, created_at, updated_at
            FROM servers
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Server::from))
    }

    #[instrument(skip(self))]
    async fn find_by_discord_id(&self, discord_server_id: &str) -> RepoResult<Option<Server>> {
        let result = sqlx::query_as::<_, ServerModel>(
            r"
            SELECT id, discord_server_id, name, icon, owner_discord_id, member_count,
                   bot_joined_at, created_at, updated_at
            FROM servers
            WHERE discord_server_id = $1
            ",
        )
        .bind(discord_server_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Server::from))
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Server>> {
        let rows = sqlx::query_as::<_, ServerModel>(
            r"
            SELECT s.id, s.discord_server_id, s.name, s.icon, s.owner_discord_id,
                   s.member_count, s.bot_joined_at, s.created_at, s.updated_at
            FROM servers s
            WHERE EXISTS (
                    SELECT 1 FROM user_server_visibility v
                    WHERE v.server_id = s.id AND v.user_id = $1
                  )
               OR EXISTS (
                    SELECT 1 FROM user_roles r
                    WHERE r.server_id = s.id AND r.user_id = $1
                  )
               OR EXISTS (
                    SELECT 1 FROM users u
                    WHERE u.id = $1 AND u.discord_id = s.owner_discord_id
                  )
            ORDER BY lower(s.name), s.id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Server::from).collect())
    }
}
