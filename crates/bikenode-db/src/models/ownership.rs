//! Ownership database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for ownerships table
#[derive(Debug, Clone, FromRow)]
pub struct OwnershipModel {
    pub id: i64,
    pub user_id: i64,
    pub motorcycle_id: i64,
    pub purchase_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub end_reason: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnershipModel {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}
