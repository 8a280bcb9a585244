//! # bikenode-core
//!
//! Domain layer containing entities, value objects and the ports (repository
//! and integration traits) the service layer depends on.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    DiscordLogin, DiscordProfile, DiscordTokens, Motorcycle, MotorcycleFilter, NewMotorcycle,
    Ownership, Server, ServerChannel, ServerConfig, ServerConfigUpdate, ServerVisibility,
    TimelineEvent, TimelineEventType, User, UserRole,
};
pub use error::{DomainError, UpstreamError};
pub use traits::{
    BotApi, IdentityProvider, MotorcycleRepository, OwnershipRepository, RepoResult,
    ServerConfigRepository, ServerRepository, TimelineEventRepository, UserRepository,
    UserRoleRepository, VisibilityRepository,
};
pub use value_objects::{PageRequest, Permissions, Snowflake, SnowflakeGenerator, SnowflakeParseError};
