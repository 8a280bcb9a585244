//! Authentication extractor
//!
//! The session JWT arrives either in the signed session cookie (browser
//! flows) or as an `Authorization: Bearer` header (API clients).

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::{
    extract::SignedCookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use bikenode_core::Snowflake;
use bikenode_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from the session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the token subject
    pub user_id: Snowflake,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = if parts.headers.contains_key(AUTHORIZATION) {
            let TypedHeader(Authorization(bearer)) =
                TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::InvalidAuthFormat)?;
            bearer.token().to_string()
        } else {
            let jar = SignedCookieJar::from_headers(&parts.headers, app_state.cookie_key().clone());
            jar.get(&app_state.config().session.cookie_name)
                .map(|cookie| cookie.value().to_string())
                .ok_or(ApiError::MissingAuth)?
        };

        let user_id = AuthService::new(app_state.service_context())
            .validate_session(&token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected session token");
                ApiError::from(e)
            })?;

        Ok(AuthUser::new(user_id))
    }
}
