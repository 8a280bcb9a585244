//! PostgreSQL implementation of OwnershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bikenode_core::entities::Ownership;
use bikenode_core::error::DomainError;
use bikenode_core::traits::{OwnershipRepository, RepoResult};
use bikenode_core::value_objects::Snowflake;

use crate::models::OwnershipModel;

use super::error::map_db_error;

/// PostgreSQL implementation of OwnershipRepository
#[derive(Clone)]
pub struct PgOwnershipRepository {
    pool: PgPool,
}

impl PgOwnershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Active-ownership index hit, or a dangling user/motorcycle reference
fn map_create_error(e: sqlx::Error, ownership: &Ownership) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return DomainError::ActiveOwnershipExists(ownership.motorcycle_id);
        }
        if db_err.is_foreign_key_violation() {
            return match db_err.constraint() {
                Some(c) if c.contains("user") => DomainError::UserNotFound(ownership.user_id),
                _ => DomainError::MotorcycleNotFound(ownership.motorcycle_id),
            };
        }
    }
    map_db_error(e)
}

#[async_trait]
impl OwnershipRepository for PgOwnershipRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Ownership>> {
        let result = sqlx::query_as::<_, OwnershipModel>(
            r"
            SELECT id, user_id, motorcycle_id, purchase_date, end_date, end_reason, notes,
                   created_at, updated_at
            FROM ownerships
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Ownership::from))
    }

    #[instrument(skip(self))]
    async fn find_active(
        &self,
        user_id: Snowflake,
        motorcycle_id: Snowflake,
    ) -> RepoResult<Option<Ownership>> {
        let result = sqlx::query_as::<_, OwnershipModel>(
            r"
            SELECT id, user_id, motorcycle_id, purchase_date, end_date, end_reason, notes,
                   created_at, updated_at
            FROM ownerships
            WHERE user_id = $1 AND motorcycle_id = $2 AND end_date IS NULL
            ",
        )
        .bind(user_id.into_inner())
        .bind(motorcycle_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Ownership::from))
    }

    #[instrument(skip(self))]
    async fn list_by_user(
        &self,
        user_id: Snowflake,
        include_inactive: bool,
    ) -> RepoResult<Vec<Ownership>> {
        let rows = sqlx::query_as::<_, OwnershipModel>(
            r"
            SELECT id, user_id, motorcycle_id, purchase_date, end_date, end_reason, notes,
                   created_at, updated_at
            FROM ownerships
            WHERE user_id = $1 AND ($2 OR end_date IS NULL)
            ORDER BY purchase_date DESC, id DESC
            ",
        )
        .bind(user_id.into_inner())
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Ownership::from).collect())
    }

    #[instrument(skip(self, ownership), fields(ownership_id = %ownership.id))]
    async fn create(&self, ownership: &Ownership) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ownerships (id, user_id, motorcycle_id, purchase_date, end_date,
                                    end_reason, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(ownership.id.into_inner())
        .bind(ownership.user_id.into_inner())
        .bind(ownership.motorcycle_id.into_inner())
        .bind(ownership.purchase_date)
        .bind(ownership.end_date)
        .bind(&ownership.end_reason)
        .bind(&ownership.notes)
        .bind(ownership.created_at)
        .bind(ownership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_create_error(e, ownership))?;

        Ok(())
    }

    #[instrument(skip(self, ownership), fields(ownership_id = %ownership.id))]
    async fn update(&self, ownership: &Ownership) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE ownerships
            SET end_date = $2, end_reason = $3, notes = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(ownership.id.into_inner())
        .bind(ownership.end_date)
        .bind(&ownership.end_reason)
        .bind(&ownership.notes)
        .bind(ownership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OwnershipNotFound(ownership.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // timeline_events and their shares go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM ownerships WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OwnershipNotFound(id));
        }

        Ok(())
    }
}
