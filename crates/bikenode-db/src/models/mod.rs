//! Database models - SQLx-compatible structs for PostgreSQL tables

mod motorcycle;
mod ownership;
mod role;
mod server;
mod timeline;
mod user;

pub use motorcycle::MotorcycleModel;
pub use ownership::OwnershipModel;
pub use role::{UserRoleModel, VisibilityModel};
pub use server::{ServerConfigModel, ServerModel};
pub use timeline::{TimelineEventModel, TimelineShareModel};
pub use user::{UpsertedUserModel, UserModel};
