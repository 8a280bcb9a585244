//! JSON API handlers under `/api`

use axum::{extract::State, Json};
use bikenode_service::{
    MotorcycleSearchQuery, MotorcycleSearchResponse, MotorcycleService, OwnershipResponse,
    OwnershipService, ServerService, UserMotorcyclesQuery, UserServerResponse,
};

use crate::extractors::{AuthUser, QueryParams};
use crate::response::ApiResult;
use crate::state::AppState;

/// Public catalog search
///
/// GET /api/motorcycles?year&make&model&package&category&page&limit
pub async fn search_motorcycles(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<MotorcycleSearchQuery>,
) -> ApiResult<Json<MotorcycleSearchResponse>> {
    let service = MotorcycleService::new(state.service_context());
    let response = service.search(query).await?;
    Ok(Json(response))
}

/// GET /api/user/servers
pub async fn user_servers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<UserServerResponse>>> {
    let service = ServerService::new(state.service_context());
    let response = service.list_user_servers(auth.user_id).await?;
    Ok(Json(response))
}

/// GET /api/user/motorcycles?include_inactive=bool
pub async fn user_motorcycles(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<UserMotorcyclesQuery>,
) -> ApiResult<Json<Vec<OwnershipResponse>>> {
    let service = OwnershipService::new(state.service_context());
    let response = service.list(auth.user_id, query.include_inactive).await?;
    Ok(Json(response))
}
