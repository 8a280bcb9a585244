//! PostgreSQL implementation of TimelineEventRepository
//!
//! An event and its share targets are always written in one transaction.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::instrument;

use bikenode_core::entities::TimelineEvent;
use bikenode_core::error::DomainError;
use bikenode_core::traits::{RepoResult, TimelineEventRepository};
use bikenode_core::value_objects::Snowflake;

use crate::mappers::{group_shares, timeline_event_with_shares};
use crate::models::{TimelineEventModel, TimelineShareModel};

use super::error::{map_db_error, map_fk_violation};

#[derive(Clone)]
pub struct PgTimelineEventRepository {
    pool: PgPool,
}

impl PgTimelineEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_shares(&self, event_ids: &[i64]) -> RepoResult<Vec<TimelineShareModel>> {
        sqlx::query_as::<_, TimelineShareModel>(
            r"
            SELECT event_id, server_id
            FROM timeline_event_shares
            WHERE event_id = ANY($1)
            ORDER BY event_id, server_id
            ",
        )
        .bind(event_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

fn unknown_share_target() -> DomainError {
    DomainError::ValidationError("shared_to_servers references an unknown server".to_string())
}

async fn insert_shares(
    tx: &mut Transaction<'_, Postgres>,
    event: &TimelineEvent,
) -> RepoResult<()> {
    if event.shared_to_servers.is_empty() {
        return Ok(());
    }

    let mut builder =
        QueryBuilder::<Postgres>::new("INSERT INTO timeline_event_shares (event_id, server_id) ");
    builder.push_values(&event.shared_to_servers, |mut b, server_id| {
        b.push_bind(event.id.into_inner()).push_bind(server_id.into_inner());
    });
    builder.push(" ON CONFLICT DO NOTHING");

    builder
        .build()
        .execute(&mut **tx)
        .await
        .map_err(|e| map_fk_violation(e, unknown_share_target))?;

    Ok(())
}

#[async_trait]
impl TimelineEventRepository for PgTimelineEventRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TimelineEvent>> {
        let row = sqlx::query_as::<_, TimelineEventModel>(
            r"
            SELECT id, ownership_id, event_type, date, title, description, media_url,
                   is_public, created_at, updated_at
            FROM timeline_events
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let shares = self
            .load_shares(&[row.id])
            .await?
            .into_iter()
            .map(|s| Snowflake::new(s.server_id))
            .collect();

        Ok(Some(timeline_event_with_shares(row, shares)))
    }

    #[instrument(skip(self))]
    async fn list_by_ownership(&self, ownership_id: Snowflake) -> RepoResult<Vec<TimelineEvent>> {
        let rows = sqlx::query_as::<_, TimelineEventModel>(
            r"
            SELECT id, ownership_id, event_type, date, title, description, media_url,
                   is_public, created_at, updated_at
            FROM timeline_events
            WHERE ownership_id = $1
            ORDER BY date DESC, id DESC
            ",
        )
        .bind(ownership_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut shares = group_shares(self.load_shares(&ids).await?);

        Ok(rows
            .into_iter()
            .map(|row| {
                let servers = shares.remove(&row.id).unwrap_or_default();
                timeline_event_with_shares(row, servers)
            })
            .collect())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: &TimelineEvent) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO timeline_events (id, ownership_id, event_type, date, title, description,
                                         media_url, is_public, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(event.id.into_inner())
        .bind(event.ownership_id.into_inner())
        .bind(event.event_type.as_str())
        .bind(event.date)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.media_url)
        .bind(event.is_public)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::OwnershipNotFound(event.ownership_id)))?;

        insert_shares(&mut tx, event).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &TimelineEvent) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            UPDATE timeline_events
            SET event_type = $2, date = $3, title = $4, description = $5, media_url = $6,
                is_public = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(event.id.into_inner())
        .bind(event.event_type.as_str())
        .bind(event.date)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.media_url)
        .bind(event.is_public)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TimelineEventNotFound(event.id));
        }

        sqlx::query("DELETE FROM timeline_event_shares WHERE event_id = $1")
            .bind(event.id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        insert_shares(&mut tx, event).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM timeline_events WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TimelineEventNotFound(id));
        }

        Ok(())
    }
}
