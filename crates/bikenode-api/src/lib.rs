//! # bikenode-api
//!
//! HTTP server built with the Axum framework: Discord login, the profile
//! garage, server bot settings and the public catalog search.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod uploads;

pub use server::{create_app, create_app_state, create_rate_limited_app, run, run_server};
pub use state::AppState;
