//! Timeline event handlers

use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use bikenode_service::{
    CreateTimelineEventRequest, TimelineEventResponse, TimelineService,
    UpdateTimelineEventRequest,
};
use serde_json::{Map, Value};
use validator::Validate;

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;
use crate::uploads;

/// Multipart field carrying the optional photo/video
const MEDIA_FIELD: &str = "media";
/// Repeated multipart field listing share targets
const SHARES_FIELD: &str = "shared_to_servers";

struct MediaUpload {
    ext: String,
    bytes: Vec<u8>,
}

/// Read a file part, refusing to buffer more than `max_bytes`
async fn read_media(mut field: Field<'_>, max_bytes: usize) -> ApiResult<Option<MediaUpload>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    if file_name.is_empty() {
        return Ok(None);
    }
    let ext = uploads::media_extension(&file_name)?;

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::invalid_upload(e.body_text()))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(ApiError::invalid_upload(format!(
                "Media exceeds the {max_bytes} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok((!bytes.is_empty()).then_some(MediaUpload { ext, bytes }))
}

/// Split a multipart body into the event form and an optional file
async fn read_event_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> ApiResult<(CreateTimelineEventRequest, Option<MediaUpload>)> {
    let mut form = Map::new();
    let mut shares = Vec::new();
    let mut media = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_body(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == MEDIA_FIELD {
            media = read_media(field, max_bytes).await?;
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;
        if name == SHARES_FIELD {
            if !text.trim().is_empty() {
                shares.push(Value::String(text));
            }
        } else if !name.is_empty() {
            form.insert(name, Value::String(text));
        }
    }
    form.insert(SHARES_FIELD.to_string(), Value::Array(shares));

    let request: CreateTimelineEventRequest = serde_json::from_value(Value::Object(form))
        .map_err(|e| ApiError::invalid_body(e.to_string()))?;
    request.validate()?;

    Ok((request, media))
}

/// Create an event, storing any attached media first
///
/// POST /profile/timeline/add
pub async fn add_event(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<Created<Json<TimelineEventResponse>>> {
    let (mut request, media) = read_event_form(multipart, state.config().upload.max_bytes).await?;

    if let Some(media) = media {
        let url = uploads::store(state.upload_dir(), &media.ext, &media.bytes).await?;
        request.media_url = Some(url);
    }
    let stored_media = request.media_url.clone();

    let service = TimelineService::new(state.service_context());
    match service.add(auth.user_id, request).await {
        Ok(response) => Ok(Created(Json(response))),
        Err(e) => {
            if let Some(url) = stored_media {
                uploads::discard(state.upload_dir(), &url).await;
            }
            Err(e.into())
        }
    }
}

/// PUT /profile/timeline/:id
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(event_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateTimelineEventRequest>,
) -> ApiResult<Json<TimelineEventResponse>> {
    let service = TimelineService::new(state.service_context());
    let response = service.update(event_id, auth.user_id, request).await?;
    Ok(Json(response))
}

/// Delete an event and its stored media
///
/// DELETE /profile/timeline/:id
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(event_id): IdPath,
) -> ApiResult<NoContent> {
    let service = TimelineService::new(state.service_context());
    let removed = service.remove(event_id, auth.user_id).await?;

    if let Some(url) = removed.media_url.as_deref() {
        uploads::discard(state.upload_dir(), url).await;
    }
    Ok(NoContent)
}
