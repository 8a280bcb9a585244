//! Middleware stack for the API server
//!
//! Provides logging, request ID generation, compression, CORS, body limits
//! and per-client rate limiting.

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use bikenode_common::{AppConfig, AppError, CorsConfig, RateLimitConfig};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests slower than this are answered with 503
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Room for multipart boundaries and the text fields next to an upload
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Apply the shared middleware stack
///
/// Layers run outermost first on requests:
/// RequestID -> Trace -> Timeout -> Compression -> CORS -> BodyLimit -> Handler
pub fn apply_middleware(router: Router<AppState>, config: &AppConfig) -> Router<AppState> {
    router
        .layer(DefaultBodyLimit::max(
            config.upload.max_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer(create_cors_layer_from_config(
            &config.cors,
            config.app.env.is_production(),
        ))
        .layer(CompressionLayer::new().gzip(true))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
}

/// Per-client rate limiting keyed on the forwarded or peer IP
///
/// The peer IP fallback needs the server to be started with
/// `into_make_service_with_connect_info`.
pub fn apply_rate_limit(
    router: Router<AppState>,
    config: &RateLimitConfig,
) -> Result<Router<AppState>, AppError> {
    let replenish_ms = (1000 / u64::from(config.requests_per_second.max(1))).max(1);
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms)
        .burst_size(config.burst.max(1))
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .ok_or_else(|| AppError::Config("Invalid rate limit configuration".to_string()))?;

    Ok(router.layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

/// Create CORS layer from configuration
fn create_cors_layer_from_config(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            header::HeaderName::from_static("x-ratelimit-limit"),
            header::HeaderName::from_static("x-ratelimit-remaining"),
            header::HeaderName::from_static("x-ratelimit-reset"),
        ]);

    // Configured origins always win; with none, production blocks browsers
    // and development allows any origin
    if is_production || !config.allowed_origins.is_empty() {
        if config.allowed_origins.is_empty() {
            tracing::warn!(
                "CORS: No allowed origins configured in production mode. \
                 Requests from browsers will be blocked."
            );
            base_layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()))
        } else {
            let origins: Vec<HeaderValue> = config
                .allowed_origins
                .iter()
                .filter_map(|origin| {
                    origin.parse::<HeaderValue>().ok().or_else(|| {
                        tracing::warn!(origin = %origin, "Invalid CORS origin");
                        None
                    })
                })
                .collect();

            tracing::info!(count = origins.len(), "CORS: Allowing configured origins");
            // Session cookies ride along on cross-origin calls
            base_layer
                .allow_origin(AllowOrigin::list(origins))
                .allow_credentials(true)
        }
    } else {
        tracing::warn!(
            "CORS: Allowing any origin (development mode). \
             Configure CORS_ORIGINS for production."
        );
        base_layer.allow_origin(Any)
    }
}
