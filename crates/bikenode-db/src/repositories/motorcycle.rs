//! PostgreSQL implementation of MotorcycleRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use bikenode_core::entities::{Motorcycle, MotorcycleFilter};
use bikenode_core::traits::{MotorcycleRepository, RepoResult};
use bikenode_core::value_objects::{PageRequest, Snowflake};

use crate::models::MotorcycleModel;

use super::error::map_db_error;

/// Rows per INSERT; keeps bind parameters well under the protocol limit
const INSERT_CHUNK: usize = 1000;

const FILTER: &str = r"
    ($1::INT IS NULL OR year = $1)
    AND ($2::TEXT IS NULL OR lower(make) = lower($2))
    AND ($3::TEXT IS NULL OR lower(model) = lower($3))
    AND ($4::TEXT IS NULL OR lower(package) = lower($4))
    AND ($5::TEXT IS NULL OR lower(category) = lower($5))
";

#[derive(Clone)]
pub struct PgMotorcycleRepository {
    pool: PgPool,
}

impl PgMotorcycleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MotorcycleRepository for PgMotorcycleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Motorcycle>> {
        let result = sqlx::query_as::<_, MotorcycleModel>(
            r"
            SELECT id, year, make, model, package, category, engine, created_at, updated_at
            FROM motorcycles
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Motorcycle::from))
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        filter: &MotorcycleFilter,
        page: PageRequest,
    ) -> RepoResult<(Vec<Motorcycle>, i64)> {
        let rows_sql = format!(
            r"
            SELECT id, year, make, model, package, category, engine, created_at, updated_at
            FROM motorcycles
            WHERE {FILTER}
            ORDER BY year DESC, make, model, package
            LIMIT $6 OFFSET $7
            "
        );
        let rows = sqlx::query_as::<_, MotorcycleModel>(&rows_sql)
            .bind(filter.year)
            .bind(&filter.make)
            .bind(&filter.model)
            .bind(&filter.package)
            .bind(&filter.category)
            .bind(i64::from(page.limit()))
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let count_sql = format!("SELECT COUNT(*) FROM motorcycles WHERE {FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.year)
            .bind(&filter.make)
            .bind(&filter.model)
            .bind(&filter.package)
            .bind(&filter.category)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok((rows.into_iter().map(Motorcycle::from).collect(), total))
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn bulk_insert(&self, rows: &[Motorcycle]) -> RepoResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut inserted = 0;

        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO motorcycles (id, year, make, model, package, category, engine, created_at, updated_at) ",
            );
            builder.push_values(chunk, |mut b, bike| {
                b.push_bind(bike.id.into_inner())
                    .push_bind(bike.year)
                    .push_bind(&bike.make)
                    .push_bind(&bike.model)
                    .push_bind(&bike.package)
                    .push_bind(&bike.category)
                    .push_bind(&bike.engine)
                    .push_bind(bike.created_at)
                    .push_bind(bike.updated_at);
            });
            // catalog duplicates (including ones inside this batch) are skipped
            builder.push(" ON CONFLICT DO NOTHING");

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(map_db_error)?;
        debug!(inserted, skipped = rows.len() as u64 - inserted, "Catalog rows loaded");
        Ok(inserted)
    }
}
