//! Health check handler

use axum::{extract::State, http::StatusCode, Json};
use bikenode_service::HealthResponse;
use tracing::warn;

use crate::state::AppState;

/// Liveness plus database reachability
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    // In-memory wiring has no pool to ping
    let db_healthy = match state.pool() {
        Some(pool) => match bikenode_db::ping(pool).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                false
            }
        },
        None => true,
    };

    let response = HealthResponse::from_checks(db_healthy);
    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
