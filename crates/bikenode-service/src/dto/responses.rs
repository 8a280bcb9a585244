//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize`. Local ids are rendered as strings
//! so JavaScript clients never lose precision.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

// ============================================================================
// User / Profile Responses
// ============================================================================

/// The signed-in user; OAuth tokens are never exposed
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub discord_id: String,
    pub username: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub avatar_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Cached Discord role
#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub server_id: String,
    pub role_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub permissions: String,
}

/// `GET /profile`
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub roles: Vec<RoleResponse>,
    pub ownerships: Vec<OwnershipWithEventsResponse>,
}

// ============================================================================
// Motorcycle Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MotorcycleResponse {
    pub id: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    pub display_name: String,
}

/// `GET /api/motorcycles`
#[derive(Debug, Clone, Serialize)]
pub struct MotorcycleSearchResponse {
    pub motorcycles: Vec<MotorcycleResponse>,
    /// Rows matching the filter, independent of paging
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// Outcome of a bulk catalog load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogImportSummary {
    pub received: usize,
    pub inserted: u64,
    pub skipped: u64,
}

// ============================================================================
// Ownership / Timeline Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OwnershipResponse {
    pub id: String,
    pub motorcycle_id: String,
    /// Missing only if the catalog row vanished underneath the ownership
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motorcycle: Option<MotorcycleResponse>,
    pub purchase_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<String>,
    pub notes: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnershipWithEventsResponse {
    #[serde(flatten)]
    pub ownership: OwnershipResponse,
    pub events: Vec<TimelineEventResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEventResponse {
    pub id: String,
    pub ownership_id: String,
    pub event_type: String,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub is_public: bool,
    pub shared_to_servers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Server Responses
// ============================================================================

/// A server in the caller's list, with their visibility and admin flag
#[derive(Debug, Clone, Serialize)]
pub struct UserServerResponse {
    pub id: String,
    pub discord_server_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub member_count: i32,
    pub is_visible: bool,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityResponse {
    pub server_id: String,
    pub is_visible: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfigResponse {
    pub id: String,
    pub server_id: String,
    pub create_brand_roles: bool,
    pub create_type_roles: bool,
    pub create_model_roles: bool,
    pub story_feed_channel_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether the bot heard about a config change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationStatus {
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationStatus {
    pub fn delivered() -> Self {
        Self {
            delivered: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            delivered: false,
            error: Some(error.into()),
        }
    }
}

/// `POST /servers/:id/config`; the config is saved even when delivery failed
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfigUpdateResponse {
    pub config: ServerConfigResponse,
    pub notification: NotificationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelListResponse {
    pub channels: Vec<ChannelResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl HealthResponse {
    pub fn from_checks(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "healthy" } else { "degraded" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
