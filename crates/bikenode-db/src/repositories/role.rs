//! PostgreSQL implementation of UserRoleRepository
//!
//! Read-only: rows are written by the bot process.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bikenode_core::entities::UserRole;
use bikenode_core::traits::{RepoResult, UserRoleRepository};
use bikenode_core::value_objects::Snowflake;

use crate::models::UserRoleModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgUserRoleRepository {
    pool: PgPool,
}

impl PgUserRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRoleRepository for PgUserRoleRepository {
    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<UserRole>> {
        let rows = sqlx::query_as::<_, UserRoleModel>(
            r"
            SELECT id, user_id, server_id, role_id, role_name, role_color, permissions
            FROM user_roles
            WHERE user_id = $1
            ORDER BY server_id, role_name
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserRole::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_user_and_server(
        &self,
        user_id: Snowflake,
        server_id: Snowflake,
    ) -> RepoResult<Vec<UserRole>> {
        let rows = sqlx::query_as::<_, UserRoleModel>(
            r"
            SELECT id, user_id, server_id, role_id, role_name, role_color, permissions
            FROM user_roles
            WHERE user_id = $1 AND server_id = $2
            ORDER BY role_name
            ",
        )
        .bind(user_id.into_inner())
        .bind(server_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserRole::from).collect())
    }
}
