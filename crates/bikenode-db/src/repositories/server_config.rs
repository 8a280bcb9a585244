//! PostgreSQL implementation of ServerConfigRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bikenode_core::entities::ServerConfig;
use bikenode_core::error::DomainError;
use bikenode_core::traits::{RepoResult, ServerConfigRepository};
use bikenode_core::value_objects::Snowflake;

use crate::models::ServerConfigModel;

use super::error::{map_db_error, map_fk_violation};

#[derive(Clone)]
pub struct PgServerConfigRepository {
    pool: PgPool,
}

impl PgServerConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn server_missing(config: &ServerConfig) -> impl FnOnce() -> DomainError + '_ {
    move || DomainError::ServerNotFound(config.server_id.to_string())
}

#[async_trait]
impl ServerConfigRepository for PgServerConfigRepository {
    #[instrument(skip(self))]
    async fn find_by_server(&self, server_id: Snowflake) -> RepoResult<Option<ServerConfig>> {
        let result = sqlx::query_as::<_, ServerConfigModel>(
            r"
            SELECT id, server_id, create_brand_roles, create_type_roles, create_model_roles,
                   story_feed_channel_id, created_at, updated_at
            FROM server_configs
            WHERE server_id = $1
            ",
        )
        .bind(server_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ServerConfig::from))
    }

    #[instrument(skip(self, config), fields(server_id = %config.server_id))]
    async fn insert_if_absent(&self, config: &ServerConfig) -> RepoResult<ServerConfig> {
        sqlx::query(
            r"
            INSERT INTO server_configs (id, server_id, create_brand_roles, create_type_roles,
                                        create_model_roles, story_feed_channel_id,
                                        created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (server_id) DO NOTHING
            ",
        )
        .bind(config.id.into_inner())
        .bind(config.server_id.into_inner())
        .bind(config.create_brand_roles)
        .bind(config.create_type_roles)
        .bind(config.create_model_roles)
        .bind(&config.story_feed_channel_id)
        .bind(config.created_at)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, server_missing(config)))?;

        // whichever concurrent writer won, read back the persisted row
        self.find_by_server(config.server_id)
            .await?
            .ok_or_else(|| DomainError::ServerNotFound(config.server_id.to_string()))
    }

    #[instrument(skip(self, config), fields(server_id = %config.server_id))]
    async fn upsert(&self, config: &ServerConfig) -> RepoResult<ServerConfig> {
        let row = sqlx::query_as::<_, ServerConfigModel>(
            r"
            INSERT INTO server_configs (id, server_id, create_brand_roles, create_type_roles,
                                        create_model_roles, story_feed_channel_id,
                                        created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (server_id) DO UPDATE
            SET create_brand_roles = EXCLUDED.create_brand_roles,
                create_type_roles = EXCLUDED.create_type_roles,
                create_model_roles = EXCLUDED.create_model_roles,
                story_feed_channel_id = EXCLUDED.story_feed_channel_id,
                updated_at = GREATEST(
                    EXCLUDED.updated_at,
                    server_configs.updated_at + INTERVAL '1 microsecond'
                )
            RETURNING id, server_id, create_brand_roles, create_type_roles, create_model_roles,
                      story_feed_channel_id, created_at, updated_at
            ",
        )
        .bind(config.id.into_inner())
        .bind(config.server_id.into_inner())
        .bind(config.create_brand_roles)
        .bind(config.create_type_roles)
        .bind(config.create_model_roles)
        .bind(&config.story_feed_channel_id)
        .bind(config.created_at)
        .bind(config.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, server_missing(config)))?;

        Ok(ServerConfig::from(row))
    }
}
