//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and, where they carry user input,
//! `Validate`. Browser forms post checkboxes as `"on"` and omit them when
//! unchecked, so boolean form fields go through [`checkbox`].

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

/// Accepts a JSON bool, or the strings `on` / `true` / `1` as true and
/// anything else as false
pub fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "on" | "true" | "1"),
    })
}

fn optional_checkbox<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    checkbox(deserializer).map(Some)
}

/// Empty form fields count as absent
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Discord snowflakes are decimal strings; an empty value clears the channel
fn validate_channel_id(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("channel_id")
            .with_message("Channel id must be a Discord snowflake".into()))
    }
}

// ============================================================================
// Ownership Requests
// ============================================================================

/// Add a motorcycle to the caller's garage
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddOwnershipRequest {
    #[validate(length(min = 1, max = 20, message = "motorcycle_id is required"))]
    pub motorcycle_id: String,

    /// `YYYY-MM-DD`
    pub purchase_date: NaiveDate,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: String,
}

/// Soft-end an ownership (sold, stolen, written off)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EndOwnershipRequest {
    pub end_date: NaiveDate,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 200, message = "End reason must be at most 200 characters"))]
    pub end_reason: Option<String>,
}

/// `?include_inactive=true`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMotorcyclesQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

// ============================================================================
// Timeline Requests
// ============================================================================

/// New timeline event
///
/// `media_url` is filled in by the upload handler, never by the client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTimelineEventRequest {
    #[validate(length(min = 1, max = 20, message = "ownership_id is required"))]
    pub ownership_id: String,

    /// PHOTO, MAINTENANCE, MODIFICATION, REPAIR, TRIP or MILESTONE (any case)
    pub event_type: String,

    pub date: NaiveDate,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[serde(skip)]
    pub media_url: Option<String>,

    #[serde(default, deserialize_with = "checkbox")]
    pub is_public: bool,

    /// Local server ids to share the event with
    #[serde(default)]
    #[validate(length(max = 50, message = "An event can be shared with at most 50 servers"))]
    pub shared_to_servers: Vec<String>,
}

/// Partial update of a timeline event; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTimelineEventRequest {
    pub event_type: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "optional_checkbox")]
    pub is_public: Option<bool>,

    #[validate(length(max = 50, message = "An event can be shared with at most 50 servers"))]
    pub shared_to_servers: Option<Vec<String>>,
}

// ============================================================================
// Motorcycle Requests
// ============================================================================

/// `GET /api/motorcycles` query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MotorcycleSearchQuery {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub package: Option<String>,
    pub category: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// ============================================================================
// Server Requests
// ============================================================================

/// Bot settings form for one server
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateServerConfigRequest {
    #[serde(default, deserialize_with = "checkbox")]
    pub create_brand_roles: bool,

    #[serde(default, deserialize_with = "checkbox")]
    pub create_type_roles: bool,

    #[serde(default, deserialize_with = "checkbox")]
    pub create_model_roles: bool,

    #[serde(default)]
    #[validate(
        length(max = 20, message = "Channel id must be at most 20 digits"),
        custom(function = "validate_channel_id")
    )]
    pub story_feed_channel_id: String,
}

/// `PUT /profile/servers/:id/visibility`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetVisibilityRequest {
    pub is_visible: bool,
}
