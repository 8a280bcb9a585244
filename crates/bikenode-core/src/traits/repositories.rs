//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{
    Motorcycle, MotorcycleFilter, Ownership, Server, ServerConfig, ServerVisibility,
    TimelineEvent, User, UserRole,
};
use crate::error::DomainError;
use crate::value_objects::{PageRequest, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    async fn find_by_discord_id(&self, discord_id: &str) -> RepoResult<Option<User>>;

    /// Insert `user`, or overwrite the mutable fields of the row sharing its
    /// `discord_id`. Atomic per discord_id.
    ///
    /// Returns the stored row and whether it was newly created. On update the
    /// stored row keeps its original `id` and `created_at`.
    async fn upsert_by_discord_id(&self, user: &User) -> RepoResult<(User, bool)>;
}

// ============================================================================
// Motorcycle Repository
// ============================================================================

#[async_trait]
pub trait MotorcycleRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Motorcycle>>;

    /// Filtered page plus the total number of rows matching the filter
    async fn search(
        &self,
        filter: &MotorcycleFilter,
        page: PageRequest,
    ) -> RepoResult<(Vec<Motorcycle>, i64)>;

    /// Batch-load catalog rows, skipping ones already present.
    /// Returns how many rows were inserted.
    async fn bulk_insert(&self, rows: &[Motorcycle]) -> RepoResult<u64>;
}

// ============================================================================
// Ownership Repository
// ============================================================================

#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Ownership>>;

    /// The user's ownership of `motorcycle_id` that has no end date, if any
    async fn find_active(
        &self,
        user_id: Snowflake,
        motorcycle_id: Snowflake,
    ) -> RepoResult<Option<Ownership>>;

    /// Newest purchase first
    async fn list_by_user(
        &self,
        user_id: Snowflake,
        include_inactive: bool,
    ) -> RepoResult<Vec<Ownership>>;

    /// Fails with `ActiveOwnershipExists` if an active row for the same
    /// user+motorcycle is already stored
    async fn create(&self, ownership: &Ownership) -> RepoResult<()>;

    /// Persist end_date / end_reason / notes
    async fn update(&self, ownership: &Ownership) -> RepoResult<()>;

    /// Hard delete; timeline events go with it
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Timeline Event Repository
// ============================================================================

#[async_trait]
pub trait TimelineEventRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TimelineEvent>>;

    /// Most recent first
    async fn list_by_ownership(&self, ownership_id: Snowflake) -> RepoResult<Vec<TimelineEvent>>;

    /// Stores the event and its share targets together
    async fn create(&self, event: &TimelineEvent) -> RepoResult<()>;

    /// Updates the event and replaces its share targets
    async fn update(&self, event: &TimelineEvent) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Server Repositories
// ============================================================================

#[async_trait]
pub trait ServerRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Server>>;

    async fn find_by_discord_id(&self, discord_server_id: &str) -> RepoResult<Option<Server>>;

    /// Servers the user is linked to: a visibility row, a cached role, or
    /// ownership of the server
    async fn list_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Server>>;
}

#[async_trait]
pub trait ServerConfigRepository: Send + Sync {
    async fn find_by_server(&self, server_id: Snowflake) -> RepoResult<Option<ServerConfig>>;

    /// Store `config` unless the server already has one; returns the stored row
    async fn insert_if_absent(&self, config: &ServerConfig) -> RepoResult<ServerConfig>;

    /// Insert or update by server_id. An existing row keeps its `id` and
    /// `created_at`. Returns the stored row.
    async fn upsert(&self, config: &ServerConfig) -> RepoResult<ServerConfig>;
}

#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<UserRole>>;

    async fn list_by_user_and_server(
        &self,
        user_id: Snowflake,
        server_id: Snowflake,
    ) -> RepoResult<Vec<UserRole>>;
}

#[async_trait]
pub trait VisibilityRepository: Send + Sync {
    async fn find(
        &self,
        user_id: Snowflake,
        server_id: Snowflake,
    ) -> RepoResult<Option<ServerVisibility>>;

    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ServerVisibility>>;

    /// Insert or update; an existing row keeps `created_at`
    async fn set(&self, visibility: &ServerVisibility) -> RepoResult<ServerVisibility>;
}
