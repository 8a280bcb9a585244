//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! configuration, the cookie signing key and (when wired to Postgres) the
//! pool used by the health check.

use std::path::Path;
use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use bikenode_common::{AppConfig, AppError, JwtService, MIN_SESSION_SECRET_LEN};
use bikenode_db::PgPool;
use bikenode_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Signs the session and OAuth state cookies
    cookie_key: Key,
    /// `None` when the repositories are not backed by Postgres
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new AppState
    ///
    /// # Errors
    /// `Config` if the session secret is too short to derive a signing key from
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        pool: Option<PgPool>,
    ) -> Result<Self, AppError> {
        let secret = config.session.secret.as_bytes();
        if secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::Config(format!(
                "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes"
            )));
        }
        let cookie_key = Key::derive_from(secret);

        Ok(Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            cookie_key,
            pool,
        })
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    pub fn cookie_key(&self) -> &Key {
        &self.cookie_key
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Directory uploaded timeline media is written to and served from
    pub fn upload_dir(&self) -> &Path {
        Path::new(&self.config.upload.dir)
    }

    /// Only send cookies over TLS in production
    pub fn secure_cookies(&self) -> bool {
        self.config.session.secure || self.config.app.env.is_production()
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("pool", &self.pool.is_some())
            .finish()
    }
}
