//! Profile handlers
//!
//! The signed-in user's garage: ownerships and server visibility.

use axum::{extract::State, Json};
use bikenode_service::{
    AddOwnershipRequest, EndOwnershipRequest, OwnershipResponse, OwnershipService,
    ProfileResponse, ProfileService, ServerService, SetVisibilityRequest, VisibilityResponse,
};

use crate::extractors::{AuthUser, IdPath, ServerIdPath, ValidatedForm, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let service = ProfileService::new(state.service_context());
    let response = service.get_profile(auth.user_id).await?;
    Ok(Json(response))
}

/// Add a motorcycle to the garage
///
/// POST /profile/bikes/add
pub async fn add_bike(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedForm(request): ValidatedForm<AddOwnershipRequest>,
) -> ApiResult<Created<Json<OwnershipResponse>>> {
    let service = OwnershipService::new(state.service_context());
    let response = service.add(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Mark an ownership as ended
///
/// POST /profile/bikes/:id/end
pub async fn end_bike(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(ownership_id): IdPath,
    ValidatedForm(request): ValidatedForm<EndOwnershipRequest>,
) -> ApiResult<Json<OwnershipResponse>> {
    let service = OwnershipService::new(state.service_context());
    let response = service.end(ownership_id, auth.user_id, request).await?;
    Ok(Json(response))
}

/// Delete an ownership and its timeline
///
/// POST /profile/bikes/:id/remove
pub async fn remove_bike(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(ownership_id): IdPath,
) -> ApiResult<NoContent> {
    let service = OwnershipService::new(state.service_context());
    service.remove(ownership_id, auth.user_id).await?;
    Ok(NoContent)
}

/// PUT /profile/servers/:id/visibility
pub async fn set_server_visibility(
    State(state): State<AppState>,
    auth: AuthUser,
    ServerIdPath(server_id): ServerIdPath,
    ValidatedJson(request): ValidatedJson<SetVisibilityRequest>,
) -> ApiResult<Json<VisibilityResponse>> {
    let service = ServerService::new(state.service_context());
    let response = service
        .set_visibility(auth.user_id, &server_id, request.is_visible)
        .await?;
    Ok(Json(response))
}
