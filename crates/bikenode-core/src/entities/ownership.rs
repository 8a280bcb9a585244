//! Ownership entity - a user's tenure with one motorcycle

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Links a user to a catalog motorcycle between purchase and (optional) end date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub motorcycle_id: Snowflake,
    pub purchase_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub end_reason: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ownership {
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        motorcycle_id: Snowflake,
        purchase_date: NaiveDate,
        notes: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            motorcycle_id,
            purchase_date,
            end_date: None,
            end_reason: None,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Still owned (no end date recorded)
    #[inline]
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }

    /// Soft-end the ownership
    pub fn end(&mut self, end_date: NaiveDate, reason: Option<String>) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::OwnershipAlreadyEnded(self.id));
        }
        if end_date < self.purchase_date {
            return Err(DomainError::ValidationError(format!(
                "end_date {end_date} is before purchase_date {}",
                self.purchase_date
            )));
        }
        self.end_date = Some(end_date);
        self.end_reason = reason.filter(|r| !r.trim().is_empty());
        self.updated_at = Utc::now();
        Ok(())
    }
}
