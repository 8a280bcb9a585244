//! # bikenode-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `bikenode-core`. It handles:
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bikenode_common::AppConfig;
//! use bikenode_db::{create_pool, run_migrations, PgUserRepository};
//!
//! async fn example(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&config.database).await?;
//!     run_migrations(&pool).await?;
//!     let user_repo = PgUserRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_lazy_pool, create_pool, ping, run_migrations, PgPool};
pub use repositories::{
    PgMotorcycleRepository, PgOwnershipRepository, PgServerConfigRepository, PgServerRepository,
    PgTimelineEventRepository, PgUserRepository, PgUserRoleRepository, PgVisibilityRepository,
};
