//! # bikenode-discord
//!
//! HTTP adapters for the two outbound integrations:
//!
//! - [`DiscordOAuthClient`] implements [`bikenode_core::IdentityProvider`]
//!   (authorize URL, code exchange, `/users/@me`)
//! - [`BotApiClient`] implements [`bikenode_core::BotApi`]
//!   (channel listing, config change notification)
//!
//! Both share one `reqwest` client with a fixed timeout that never follows
//! redirects. Nothing is retried.

mod bot;
mod error;
mod http;
mod oauth;

pub use bot::BotApiClient;
pub use error::ClientSetupError;
pub use http::build_http_client;
pub use oauth::{DiscordOAuthClient, OAuth2Client, DISCORD_SCOPES};
