//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BotConfig, ConfigError, CorsConfig, DatabaseConfig, DiscordConfig,
    Environment, HttpClientConfig, JwtConfig, RateLimitConfig, ServerConfig, SessionConfig,
    SnowflakeConfig, UploadConfig, MIN_SESSION_SECRET_LEN,
};
