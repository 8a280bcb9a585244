//! Ports implemented by the infrastructure crates

mod discord;
mod repositories;

pub use discord::{BotApi, IdentityProvider};
pub use repositories::{
    MotorcycleRepository, OwnershipRepository, RepoResult, ServerConfigRepository,
    ServerRepository, TimelineEventRepository, UserRepository, UserRoleRepository,
    VisibilityRepository,
};
