//! Server setup and initialization
//!
//! Provides the application builder, dependency wiring and the server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use bikenode_common::{AppConfig, AppError, JwtService};
use bikenode_core::SnowflakeGenerator;
use bikenode_db::{
    create_pool, run_migrations, PgMotorcycleRepository, PgOwnershipRepository,
    PgServerConfigRepository, PgServerRepository, PgTimelineEventRepository, PgUserRepository,
    PgUserRoleRepository, PgVisibilityRepository,
};
use bikenode_discord::{build_http_client, BotApiClient, DiscordOAuthClient};
use bikenode_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes, upload_routes};
use crate::state::AppState;

/// Build the application with all routes and middleware, without rate limiting
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(upload_routes(&state.config().upload.dir));
    finish(router, state)
}

/// Build the application as served in production: rate limiting on
/// everything except `/health`
pub fn create_rate_limited_app(state: AppState) -> Result<Router, AppError> {
    let router = create_router().merge(upload_routes(&state.config().upload.dir));
    let router = apply_rate_limit(router, &state.config().rate_limit)?;
    Ok(finish(router, state))
}

fn finish(router: Router<AppState>, state: AppState) -> Router {
    let router = apply_middleware(router.merge(health_routes()), state.config());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migrations failed: {e}")))?;
    info!("Database migrations applied");

    // One outbound client shared by the OAuth and bot adapters
    let http = build_http_client(&config.http).map_err(|e| AppError::Config(e.to_string()))?;
    let identity_provider = Arc::new(
        DiscordOAuthClient::new(&config.discord, http.clone())
            .map_err(|e| AppError::Config(e.to_string()))?,
    );
    let bot_api = Arc::new(
        BotApiClient::new(&config.bot, http).map_err(|e| AppError::Config(e.to_string()))?,
    );

    let jwt_service = Arc::new(JwtService::from_config(&config.jwt)?);
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .motorcycle_repo(Arc::new(PgMotorcycleRepository::new(pool.clone())))
        .ownership_repo(Arc::new(PgOwnershipRepository::new(pool.clone())))
        .timeline_repo(Arc::new(PgTimelineEventRepository::new(pool.clone())))
        .server_repo(Arc::new(PgServerRepository::new(pool.clone())))
        .server_config_repo(Arc::new(PgServerConfigRepository::new(pool.clone())))
        .role_repo(Arc::new(PgUserRoleRepository::new(pool.clone())))
        .visibility_repo(Arc::new(PgVisibilityRepository::new(pool.clone())))
        .identity_provider(identity_provider)
        .bot_api(bot_api)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    AppState::new(service_context, config, Some(pool))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!(address = %addr, "Starting HTTP server");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();

    let state = create_app_state(config).await?;
    let app = create_rate_limited_app(state)?;

    run_server(app, &addr).await
}
