//! PostgreSQL implementation of VisibilityRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bikenode_core::entities::ServerVisibility;
use bikenode_core::error::DomainError;
use bikenode_core::traits::{RepoResult, VisibilityRepository};
use bikenode_core::value_objects::Snowflake;

use crate::models::VisibilityModel;

use super::error::{map_db_error, map_fk_violation};

#[derive(Clone)]
pub struct PgVisibilityRepository {
    pool: PgPool,
}

impl PgVisibilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisibilityRepository for PgVisibilityRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        user_id: Snowflake,
        server_id: Snowflake,
    ) -> RepoResult<Option<ServerVisibility>> {
        let result = sqlx::query_as::<_, VisibilityModel>(
            r"
            SELECT user_id, server_id, is_visible, created_at, updated_at
            FROM user_server_visibility
            WHERE user_id = $1 AND server_id = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(server_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ServerVisibility::from))
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ServerVisibility>> {
        let rows = sqlx::query_as::<_, VisibilityModel>(
            r"
            SELECT user_id, server_id, is_visible, created_at, updated_at
            FROM user_server_visibility
            WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ServerVisibility::from).collect())
    }

    #[instrument(skip(self))]
    async fn set(&self, visibility: &ServerVisibility) -> RepoResult<ServerVisibility> {
        let row = sqlx::query_as::<_, VisibilityModel>(
            r"
            INSERT INTO user_server_visibility (user_id, server_id, is_visible, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, server_id) DO UPDATE
            SET is_visible = EXCLUDED.is_visible,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, server_id, is_visible, created_at, updated_at
            ",
        )
        .bind(visibility.user_id.into_inner())
        .bind(visibility.server_id.into_inner())
        .bind(visibility.is_visible)
        .bind(visibility.created_at)
        .bind(visibility.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_fk_violation(e, || DomainError::ServerNotFound(visibility.server_id.to_string()))
        })?;

        Ok(ServerVisibility::from(row))
    }
}
