//! Timeline event models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for timeline_events table.
/// Share targets live in `timeline_event_shares` and are loaded separately.
#[derive(Debug, Clone, FromRow)]
pub struct TimelineEventModel {
    pub id: i64,
    pub ownership_id: i64,
    pub event_type: String,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub media_url: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of timeline_event_shares
#[derive(Debug, Clone, FromRow)]
pub struct TimelineShareModel {
    pub event_id: i64,
    pub server_id: i64,
}
