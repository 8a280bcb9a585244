//! Domain errors - error types for the domain layer

use thiserror::Error;

use super::UpstreamError;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Motorcycle not found: {0}")]
    MotorcycleNotFound(Snowflake),

    #[error("Ownership not found: {0}")]
    OwnershipNotFound(Snowflake),

    #[error("Timeline event not found: {0}")]
    TimelineEventNotFound(Snowflake),

    #[error("Server not found: {0}")]
    ServerNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Ownership {0} has already ended")]
    OwnershipAlreadyEnded(Snowflake),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Ownership {0} belongs to another user")]
    NotOwner(Snowflake),

    #[error("Not an admin of server {0}")]
    NotServerAdmin(String),

    #[error("Not a member of server {0}")]
    NotServerMember(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Motorcycle {0} is already actively owned by this user")]
    ActiveOwnershipExists(Snowflake),

    // =========================================================================
    // Upstream Errors (identity provider, bot API)
    // =========================================================================
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::MotorcycleNotFound(_) => "UNKNOWN_MOTORCYCLE",
            Self::OwnershipNotFound(_) => "UNKNOWN_OWNERSHIP",
            Self::TimelineEventNotFound(_) => "UNKNOWN_TIMELINE_EVENT",
            Self::ServerNotFound(_) => "UNKNOWN_SERVER",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::OwnershipAlreadyEnded(_) => "OWNERSHIP_ALREADY_ENDED",

            Self::NotOwner(_) => "NOT_OWNER",
            Self::NotServerAdmin(_) => "NOT_SERVER_ADMIN",
            Self::NotServerMember(_) => "NOT_SERVER_MEMBER",

            Self::ActiveOwnershipExists(_) => "ACTIVE_OWNERSHIP_EXISTS",

            Self::Upstream(e) => e.code(),

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::MotorcycleNotFound(_)
                | Self::OwnershipNotFound(_)
                | Self::TimelineEventNotFound(_)
                | Self::ServerNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::OwnershipAlreadyEnded(_))
    }

    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotOwner(_) | Self::NotServerAdmin(_) | Self::NotServerMember(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ActiveOwnershipExists(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}
