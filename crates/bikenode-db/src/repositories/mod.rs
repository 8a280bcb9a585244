//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in bikenode-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod motorcycle;
mod ownership;
mod role;
mod server;
mod server_config;
mod timeline;
mod user;
mod visibility;

pub use motorcycle::PgMotorcycleRepository;
pub use ownership::PgOwnershipRepository;
pub use role::PgUserRoleRepository;
pub use server::PgServerRepository;
pub use server_config::PgServerConfigRepository;
pub use timeline::PgTimelineEventRepository;
pub use user::PgUserRepository;
pub use visibility::PgVisibilityRepository;
