//! Authentication service
//!
//! Discord OAuth2 sign-in: builds the authorize redirect, completes the code
//! exchange, upserts the local user and issues the session token. Also
//! resolves session tokens back to users for the API extractors.

use bikenode_common::{AppError, SessionToken};
use bikenode_core::entities::User;
use bikenode_core::Snowflake;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const STATE_LEN: usize = 32;

/// Where to send the browser, and the state it must bring back
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub url: String,
    pub state: String,
}

/// A completed sign-in
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub session: SessionToken,
    /// First sign-in for this Discord account
    pub created: bool,
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fresh CSRF state plus the Discord authorize URL carrying it
    pub fn begin_login(&self) -> LoginRedirect {
        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect();
        let url = self.authorization_url(&state);
        LoginRedirect { url, state }
    }

    /// Authorize URL for an externally generated state
    pub fn authorization_url(&self, state: &str) -> String {
        self.ctx.identity_provider().authorization_url(state)
    }

    /// Check the state echoed by Discord against the one we issued
    ///
    /// # Errors
    /// `Validation` if either side is missing or they differ
    pub fn verify_state(expected: Option<&str>, returned: Option<&str>) -> ServiceResult<()> {
        match (expected, returned) {
            (Some(expected), Some(returned)) if !expected.is_empty() && expected == returned => {
                Ok(())
            }
            (None, _) => Err(ServiceError::validation("OAuth state cookie missing or expired")),
            _ => Err(ServiceError::validation("OAuth state mismatch")),
        }
    }

    /// Exchange the authorization code, upsert the user and issue a session
    #[instrument(skip(self, code))]
    pub async fn complete_login(&self, code: &str) -> ServiceResult<SignedIn> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ServiceError::validation("Missing authorization code"));
        }

        let login = self
            .ctx
            .identity_provider()
            .exchange_code(code)
            .await
            .map_err(|e| {
                warn!(error = %e, "Discord code exchange failed");
                ServiceError::from(e)
            })?;

        let candidate = User::from_discord(self.ctx.generate_id(), &login.profile, &login.tokens);
        let (user, created) = self.ctx.user_repo().upsert_by_discord_id(&candidate).await?;

        let session = self.ctx.jwt_service().issue(user.id)?;

        info!(
            user_id = %user.id,
            discord_id = %user.discord_id,
            created,
            "User signed in"
        );

        Ok(SignedIn {
            user,
            session,
            created,
        })
    }

    /// Resolve a session token to its user id
    pub fn validate_session(&self, token: &str) -> ServiceResult<Snowflake> {
        Ok(self.ctx.jwt_service().validate(token)?)
    }

    /// Resolve a session token to a stored user
    ///
    /// # Errors
    /// Token errors as `App`, and `InvalidToken` when the user no longer exists
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let user_id = self.validate_session(token)?;
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))
    }
}
