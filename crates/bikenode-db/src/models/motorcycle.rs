//! Motorcycle catalog model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MotorcycleModel {
    pub id: i64,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub package: Option<String>,
    pub category: Option<String>,
    pub engine: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
