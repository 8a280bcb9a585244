//! Motorcycle catalog service
//!
//! Filtered, paginated catalog search plus the batch entry point used by
//! seeding tools.

use std::collections::HashSet;

use bikenode_core::entities::{Motorcycle, MotorcycleFilter, NewMotorcycle};
use bikenode_core::PageRequest;
use chrono::{Datelike, Utc};
use tracing::{info, instrument, warn};

use crate::dto::{
    CatalogImportSummary, MotorcycleResponse, MotorcycleSearchQuery, MotorcycleSearchResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Oldest model year accepted into the catalog
const FIRST_MODEL_YEAR: i32 = 1885;

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Motorcycle catalog service
pub struct MotorcycleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MotorcycleService<'a> {
    /// Create a new MotorcycleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Case-insensitive equality search; out-of-range paging is coerced
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: MotorcycleSearchQuery,
    ) -> ServiceResult<MotorcycleSearchResponse> {
        let filter = MotorcycleFilter {
            year: query.year,
            make: query.make,
            model: query.model,
            package: query.package,
            category: query.category,
        }
        .normalized();
        let page = PageRequest::new(query.page, query.limit);

        let (rows, total) = self.ctx.motorcycle_repo().search(&filter, page).await?;

        Ok(MotorcycleSearchResponse {
            motorcycles: rows.iter().map(MotorcycleResponse::from).collect(),
            total,
            page: page.page(),
            limit: page.limit(),
        })
    }

    /// Load catalog rows in bulk
    ///
    /// Rows with a blank make/model or an implausible year are dropped, as are
    /// duplicates within the batch and rows already in the catalog.
    #[instrument(skip(self, rows), fields(received = rows.len()))]
    pub async fn import_catalog(
        &self,
        rows: Vec<NewMotorcycle>,
    ) -> ServiceResult<CatalogImportSummary> {
        let received = rows.len();
        let max_year = Utc::now().year() + 2;
        let mut seen = HashSet::new();
        let mut batch = Vec::with_capacity(rows.len());

        for row in rows {
            if row.make.trim().is_empty() || row.model.trim().is_empty() {
                warn!(year = row.year, "Skipping catalog row without make/model");
                continue;
            }
            if !(FIRST_MODEL_YEAR..=max_year).contains(&row.year) {
                warn!(year = row.year, make = %row.make, "Skipping catalog row with bad year");
                continue;
            }
            if !seen.insert(row.catalog_key()) {
                continue;
            }

            let now = Utc::now();
            batch.push(Motorcycle {
                id: self.ctx.generate_id(),
                year: row.year,
                make: row.make.trim().to_string(),
                model: row.model.trim().to_string(),
                package: clean(row.package),
                category: clean(row.category),
                engine: clean(row.engine),
                created_at: now,
                updated_at: now,
            });
        }

        let inserted = if batch.is_empty() {
            0
        } else {
            self.ctx.motorcycle_repo().bulk_insert(&batch).await?
        };
        let summary = CatalogImportSummary {
            received,
            inserted,
            skipped: received as u64 - inserted,
        };

        info!(
            received = summary.received,
            inserted = summary.inserted,
            skipped = summary.skipped,
            "Catalog import finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{motorcycle, TestHarness};

    fn seeded() -> TestHarness {
        let harness = TestHarness::new();
        harness.db.add_motorcycle(motorcycle(1, 2020, "Honda", "CB500X"));
        harness.db.add_motorcycle(motorcycle(2, 2021, "Honda", "CB500X"));
        harness.db.add_motorcycle(motorcycle(3, 2021, "Yamaha", "MT-07"));
        harness.db.add_motorcycle(motorcycle(4, 2021, "Honda", "Africa Twin"));
        harness
    }

    fn row(year: i32, make: &str, model: &str, package: Option<&str>) -> NewMotorcycle {
        NewMotorcycle {
            year,
            make: make.to_string(),
            model: model.to_string(),
            package: package.map(str::to_string),
            category: None,
            engine: None,
        }
    }

    #[tokio::test]
    async fn test_exact_filter_returns_only_matches() {
        let harness = seeded();
        let result = MotorcycleService::new(&harness.ctx)
            .search(MotorcycleSearchQuery {
                year: Some(2021),
                make: Some("honda".to_string()),
                model: Some("CB500X".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.motorcycles.len(), 1);
        assert_eq!(result.motorcycles[0].id, "2");
    }

    #[tokio::test]
    async fn test_total_is_independent_of_paging() {
        let harness = seeded();
        let result = MotorcycleService::new(&harness.ctx)
            .search(MotorcycleSearchQuery {
                make: Some("Honda".to_string()),
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(result.motorcycles.len(), 1);
        assert_eq!((result.page, result.limit), (2, 2));
        // year desc, make, model
        assert_eq!(result.motorcycles[0].id, "1");
    }

    #[tokio::test]
    async fn test_out_of_range_paging_is_coerced() {
        let harness = seeded();
        let service = MotorcycleService::new(&harness.ctx);
        for (page, limit) in [(Some(0), Some(0)), (Some(-3), Some(101)), (None, Some(-1))] {
            let result = service
                .search(MotorcycleSearchQuery {
                    page,
                    limit,
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!((result.page, result.limit), (1, 20));
            assert_eq!(result.total, 4);
        }
    }

    #[tokio::test]
    async fn test_import_skips_duplicates_and_bad_rows() {
        let harness = seeded();
        let summary = MotorcycleService::new(&harness.ctx)
            .import_catalog(vec![
                row(2022, "Ducati", "Monster", None),
                row(2022, "DUCATI ", "monster", Some("")),
                row(2021, "honda", "cb500x", None),
                row(2022, "", "Nameless", None),
                row(1700, "Steam", "Velocipede", None),
                row(2022, "Ducati", "Monster", Some("SP")),
            ])
            .await
            .unwrap();
        assert_eq!(summary.received, 6);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped, 4);
        assert_eq!(harness.db.motorcycle_count(), 6);
    }
}
