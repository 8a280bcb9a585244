//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! request and orchestrates repositories and outbound integrations.

pub mod auth;
pub mod context;
pub mod error;
pub mod motorcycle;
pub mod ownership;
pub mod profile;
pub mod server;
pub mod server_config;
pub mod timeline;

pub use auth::{AuthService, LoginRedirect, SignedIn};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use motorcycle::MotorcycleService;
pub use ownership::OwnershipService;
pub use profile::ProfileService;
pub use server::ServerService;
pub use server_config::ServerConfigService;
pub use timeline::TimelineService;
