//! Server admin handlers
//!
//! All three routes are gated on the caller administering the server.

use axum::{extract::State, Json};
use bikenode_service::{
    ChannelListResponse, ServerConfigResponse, ServerConfigService, ServerConfigUpdateResponse,
    UpdateServerConfigRequest,
};

use crate::extractors::{AuthUser, ServerIdPath, ValidatedForm};
use crate::response::ApiResult;
use crate::state::AppState;

/// View the bot settings, creating the default row on first view
///
/// GET /servers/:id/config
pub async fn get_config(
    State(state): State<AppState>,
    auth: AuthUser,
    ServerIdPath(server_id): ServerIdPath,
) -> ApiResult<Json<ServerConfigResponse>> {
    let service = ServerConfigService::new(state.service_context());
    let response = service.get_config(&server_id, auth.user_id).await?;
    Ok(Json(response))
}

/// Save the bot settings and notify the bot
///
/// POST /servers/:id/config
pub async fn update_config(
    State(state): State<AppState>,
    auth: AuthUser,
    ServerIdPath(server_id): ServerIdPath,
    ValidatedForm(request): ValidatedForm<UpdateServerConfigRequest>,
) -> ApiResult<Json<ServerConfigUpdateResponse>> {
    let service = ServerConfigService::new(state.service_context());
    let response = service
        .update_config(&server_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// GET /servers/:id/channels
pub async fn list_channels(
    State(state): State<AppState>,
    auth: AuthUser,
    ServerIdPath(server_id): ServerIdPath,
) -> ApiResult<Json<ChannelListResponse>> {
    let service = ServerConfigService::new(state.service_context());
    let response = service.list_channels(&server_id, auth.user_id).await?;
    Ok(Json(response))
}
