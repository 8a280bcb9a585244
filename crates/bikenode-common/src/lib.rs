//! # bikenode-common
//!
//! Shared utilities including configuration, error handling, session tokens, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService, SessionToken, SESSION_TTL_SECS};
pub use config::{
    AppConfig, AppSettings, BotConfig, ConfigError, CorsConfig, DatabaseConfig, DiscordConfig,
    Environment, HttpClientConfig, JwtConfig, RateLimitConfig, ServerConfig, SessionConfig,
    SnowflakeConfig, UploadConfig, MIN_SESSION_SECRET_LEN,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
