//! Domain entities - core business objects

mod discord;
mod motorcycle;
mod ownership;
mod role;
mod server;
mod timeline;
mod user;

pub use discord::{DiscordLogin, DiscordProfile, DiscordTokens, ServerChannel};
pub use motorcycle::{Motorcycle, MotorcycleFilter, NewMotorcycle};
pub use ownership::Ownership;
pub use role::{ServerVisibility, UserRole};
pub use server::{Server, ServerConfig, ServerConfigUpdate};
pub use timeline::{TimelineEvent, TimelineEventType, UnknownEventType};
pub use user::User;
