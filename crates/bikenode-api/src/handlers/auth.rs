//! Discord login handlers
//!
//! `/login` stores a random CSRF state in a signed cookie and redirects to
//! Discord; `/callback` checks it, signs the user in and sets the session
//! cookie; `/logout` clears the session cookie.

use axum::{extract::State, response::Redirect};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    SignedCookieJar,
};
use bikenode_service::AuthService;
use serde::Deserialize;
use tracing::{info, warn};

use crate::extractors::QueryParams;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Cookie carrying the OAuth `state` between `/login` and `/callback`
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// The state cookie only needs to outlive the Discord consent screen
const OAUTH_STATE_MAX_AGE_MINUTES: i64 = 10;

/// Query string Discord appends to the redirect URI
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user declines consent
    pub error: Option<String>,
}

fn state_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.secure_cookies())
        .max_age(time::Duration::minutes(OAUTH_STATE_MAX_AGE_MINUTES))
        .build()
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let session = &state.config().session;
    Cookie::build((session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.secure_cookies())
        .max_age(time::Duration::days(session.max_age_days))
        .build()
}

/// Removal cookies must match the path they were set with
fn expired(name: impl Into<String>) -> Cookie<'static> {
    Cookie::build((name.into(), "")).path("/").build()
}

/// Start the Discord OAuth flow
///
/// GET /login
pub async fn login(State(state): State<AppState>, jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    let redirect = AuthService::new(state.service_context()).begin_login();
    let jar = jar.add(state_cookie(&state, redirect.state));
    (jar, Redirect::to(&redirect.url))
}

/// Finish the Discord OAuth flow
///
/// GET /callback?code&state
pub async fn callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    QueryParams(query): QueryParams<CallbackQuery>,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    if let Some(error) = query.error {
        warn!(error = %error, "Discord authorization was not granted");
        return Err(ApiError::invalid_query(format!(
            "Discord authorization failed: {error}"
        )));
    }

    let expected = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    AuthService::verify_state(expected.as_deref(), query.state.as_deref())?;

    let code = query
        .code
        .ok_or_else(|| ApiError::invalid_query("Missing authorization code"))?;

    let signed_in = AuthService::new(state.service_context())
        .complete_login(&code)
        .await?;

    info!(
        user_id = %signed_in.user.id,
        created = signed_in.created,
        "Session started"
    );

    let jar = jar
        .remove(expired(OAUTH_STATE_COOKIE))
        .add(session_cookie(&state, signed_in.session.token));
    Ok((jar, Redirect::to("/profile")))
}

/// End the session
///
/// GET /logout
pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    let jar = jar.remove(expired(state.config().session.cookie_name.clone()));
    (jar, Redirect::to("/"))
}
