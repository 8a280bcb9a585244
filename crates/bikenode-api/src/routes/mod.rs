//! Route definitions
//!
//! Browser-facing login and profile routes at the root, JSON endpoints
//! under `/api`.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::handlers::{api, auth, health, profile, servers, timeline};
use crate::state::AppState;
use crate::uploads::PUBLIC_PREFIX;

/// Create the main router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(server_routes())
        .nest("/api", api_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

/// Stored timeline media
pub fn upload_routes(upload_dir: &str) -> Router<AppState> {
    Router::new().nest_service(PUBLIC_PREFIX, ServeDir::new(upload_dir))
}

/// Discord OAuth routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", get(auth::logout))
}

/// Signed-in user's garage
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::get_profile))
        // Ownerships
        .route("/profile/bikes/add", post(profile::add_bike))
        .route("/profile/bikes/:id/end", post(profile::end_bike))
        .route("/profile/bikes/:id/remove", post(profile::remove_bike))
        // Timeline
        .route("/profile/timeline/add", post(timeline::add_event))
        .route(
            "/profile/timeline/:id",
            put(timeline::update_event).delete(timeline::delete_event),
        )
        // Servers
        .route(
            "/profile/servers/:id/visibility",
            put(profile::set_server_visibility),
        )
}

/// Server admin routes
fn server_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/servers/:id/config",
            get(servers::get_config).post(servers::update_config),
        )
        .route("/servers/:id/channels", get(servers::list_channels))
}

/// JSON API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/motorcycles", get(api::search_motorcycles))
        .route("/user/servers", get(api::user_servers))
        .route("/user/motorcycles", get(api::user_motorcycles))
}
