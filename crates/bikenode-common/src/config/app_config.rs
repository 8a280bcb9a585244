//! Application configuration structs
//!
//! Everything is read from environment variables (optionally seeded from a
//! `.env` file). A missing non-critical variable logs a warning and falls back
//! to a default; missing secrets are only tolerated outside production.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Shortest accepted `SESSION_SECRET`; the cookie signing key is derived from it
pub const MIN_SESSION_SECRET_LEN: usize = 32;

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_API_BASE_URL: &str = "https://discord.com/api";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub discord: DiscordConfig,
    pub bot: BotConfig,
    pub session: SessionConfig,
    pub jwt: JwtConfig,
    pub http: HttpClientConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Deployment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(()),
        }
    }
}

/// HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Discord OAuth2 application
#[derive(Clone)]
pub struct DiscordConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    /// Base for REST calls such as `/users/@me`
    pub api_base_url: String,
}

/// Companion bot control API
#[derive(Clone)]
pub struct BotConfig {
    pub api_url: String,
    pub token: String,
}

/// Session cookie settings
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub cookie_name: String,
    pub max_age_days: i64,
    pub secure: bool,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_secs: i64,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Timeline media uploads
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub max_bytes: usize,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

// Secrets never end up in logs
macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* } hide { $($secret:ident),* }) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    $(.field(stringify!($secret), &"<redacted>"))*
                    .finish()
            }
        }
    };
}

redacted_debug!(DiscordConfig { client_id, redirect_uri, auth_url, token_url, api_base_url } hide { client_secret });
redacted_debug!(BotConfig { api_url } hide { token });
redacted_debug!(SessionConfig { cookie_name, max_age_days, secure } hide { secret });
redacted_debug!(JwtConfig { expiry_secs } hide { secret });

// Default value functions
fn default_app_name() -> String {
    "bikenode".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_jwt_expiry_secs() -> i64 {
    7 * 24 * 60 * 60
}

fn default_session_max_age_days() -> i64 {
    7
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_upload_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_bot_api_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_redirect_uri(port: u16) -> String {
    format!("http://localhost:{port}/callback")
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Environment reader; `lookup` returns the raw value of a variable
struct Vars<F> {
    lookup: F,
    env: Environment,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    /// Value or default, warning when the variable is absent
    fn string_or(&self, key: &'static str, default: impl FnOnce() -> String) -> String {
        self.raw(key).unwrap_or_else(|| {
            let value = default();
            warn!(var = key, default = %value, "Environment variable not set, using default");
            value
        })
    }

    /// Parsed value or default; a present but unparsable value is an error
    fn parse_or<T>(&self, key: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError>
    where
        T: FromStr,
    {
        match self.raw(key) {
            Some(v) => match v.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(_) => Err(ConfigError::InvalidValue(key, v)),
            },
            None => Ok(default()),
        }
    }

    /// Secrets: required in production, random per process otherwise
    fn secret(&self, key: &'static str) -> Result<String, ConfigError> {
        match self.raw(key) {
            Some(v) => Ok(v),
            None if self.env.is_production() => Err(ConfigError::MissingVar(key)),
            None => {
                warn!(
                    var = key,
                    "Secret not set, generating a random one; sessions will not survive a restart"
                );
                Ok(random_secret())
            }
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    /// Returns an error if a variable holds an invalid value, or a secret is
    /// missing in production
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = lookup("APP_ENV")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let vars = Vars { lookup, env };

        let port = vars.parse_or("PORT", default_port)?;

        let session_secret = vars.secret("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "SESSION_SECRET",
                format!("must be at least {MIN_SESSION_SECRET_LEN} bytes"),
            ));
        }

        let worker_id: u16 = vars.parse_or("WORKER_ID", || 0)?;
        if worker_id >= 1024 {
            return Err(ConfigError::InvalidValue("WORKER_ID", worker_id.to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.raw("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            server: ServerConfig {
                host: vars.raw("HOST").unwrap_or_else(default_host),
                port,
            },
            database: DatabaseConfig {
                url: database_url(&vars)?,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars.parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                acquire_timeout_secs: vars
                    .parse_or("DATABASE_ACQUIRE_TIMEOUT_SECS", default_acquire_timeout_secs)?,
            },
            discord: DiscordConfig {
                client_id: vars.string_or("DISCORD_CLIENT_ID", String::new),
                client_secret: vars.string_or("DISCORD_CLIENT_SECRET", String::new),
                redirect_uri: vars.string_or("DISCORD_REDIRECT_URI", || default_redirect_uri(port)),
                auth_url: vars.raw("DISCORD_AUTH_URL").unwrap_or_else(|| DISCORD_AUTH_URL.to_string()),
                token_url: vars
                    .raw("DISCORD_TOKEN_URL")
                    .unwrap_or_else(|| DISCORD_TOKEN_URL.to_string()),
                api_base_url: vars
                    .raw("DISCORD_API_BASE_URL")
                    .unwrap_or_else(|| DISCORD_API_BASE_URL.to_string()),
            },
            bot: BotConfig {
                api_url: vars.string_or("BOT_API_URL", default_bot_api_url),
                token: vars.string_or("DISCORD_BOT_TOKEN", String::new),
            },
            session: SessionConfig {
                secret: session_secret,
                cookie_name: vars
                    .raw("SESSION_COOKIE_NAME")
                    .unwrap_or_else(|| "bikenode_session".to_string()),
                max_age_days: vars.parse_or("SESSION_MAX_AGE_DAYS", default_session_max_age_days)?,
                secure: env.is_production(),
            },
            jwt: JwtConfig {
                secret: vars.secret("JWT_SECRET")?,
                expiry_secs: vars.parse_or("JWT_EXPIRY_SECS", default_jwt_expiry_secs)?,
            },
            http: HttpClientConfig {
                timeout_secs: vars.parse_or("HTTP_TIMEOUT_SECS", default_http_timeout_secs)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: vars.parse_or("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .raw("CORS_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            upload: UploadConfig {
                dir: vars.raw("UPLOAD_DIR").unwrap_or_else(default_upload_dir),
                max_bytes: vars.parse_or("UPLOAD_MAX_BYTES", default_upload_max_bytes)?,
            },
            snowflake: SnowflakeConfig { worker_id },
        })
    }
}

/// `DATABASE_URL`, or one assembled from `DB_HOST/DB_PORT/DB_USER/DB_PASSWORD/DB_NAME`
fn database_url<F>(vars: &Vars<F>) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = vars.raw("DATABASE_URL") {
        return Ok(url);
    }
    let host = vars.string_or("DB_HOST", || "localhost".to_string());
    let port: u16 = vars.parse_or("DB_PORT", || 5432)?;
    let user = vars.string_or("DB_USER", || "postgres".to_string());
    let password = vars.raw("DB_PASSWORD").unwrap_or_default();
    let name = vars.string_or("DB_NAME", || "bikenode".to_string());

    let credentials = if password.is_empty() {
        user
    } else {
        format!("{user}:{password}")
    };
    Ok(format!("postgres://{credentials}@{host}:{port}/{name}"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
