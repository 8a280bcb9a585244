//! Tracing and logging setup
//!
//! `RUST_LOG` wins when set; otherwise `LOG_LEVEL` picks the level and
//! `LOG_FORMAT=json` switches to structured output.

use std::env;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub level: Level,
    /// Emit one JSON object per line
    pub json: bool,
    /// Log span open/close events
    pub span_events: bool,
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            json: false,
            span_events: true,
            file_line: true,
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            json: true,
            span_events: false,
            file_line: false,
        }
    }

    /// Build from `LOG_LEVEL` / `LOG_FORMAT`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("LOG_LEVEL").ok().as_deref(),
            env::var("LOG_FORMAT").ok().as_deref(),
        )
    }

    /// Unknown levels fall back to INFO; any format other than `json` is text
    #[must_use]
    pub fn from_values(level: Option<&str>, format: Option<&str>) -> Self {
        let json = format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"));
        let base = if json {
            Self::production()
        } else {
            Self::default()
        };
        Self {
            level: level
                .and_then(|l| Level::from_str(l.trim()).ok())
                .unwrap_or(base.level),
            ..base
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{},sqlx=warn,hyper=info,tower_http=info",
                self.level
            ))
        })
    }
}

/// Install the global subscriber from `LOG_LEVEL` / `LOG_FORMAT`; fails if
/// one is already installed
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::from_env())
}

fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = config.env_filter();

    if config.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_span_events(config.span_events());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|_| TracingError::AlreadyInitialized)
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_span_events(config.span_events());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|_| TracingError::AlreadyInitialized)
    }
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
