//! Test helpers for integration tests
//!
//! [`TestApp`] drives the full router in-process with `oneshot` against the
//! in-memory fakes. [`TestServer`] binds a real listener on a Postgres-backed
//! app and is only used when `DATABASE_URL` is set.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use bikenode_api::{create_app, create_app_state, AppState};
use bikenode_common::{AppConfig, JwtService, SESSION_TTL_SECS};
use bikenode_db::create_lazy_pool;
use bikenode_core::{
    BotApi, DiscordProfile, DiscordTokens, IdentityProvider, Snowflake, SnowflakeGenerator, User,
};
use bikenode_service::testing::{FakeBotApi, FakeDb, FakeIdentityProvider, TEST_JWT_SECRET};
use bikenode_service::ServiceContext;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use crate::fixtures::{config_with, form_body, multipart_body, MULTIPART_BOUNDARY};

/// Fresh directory for one test's uploads
pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("bikenode-test-{}", uuid::Uuid::new_v4()))
}

/// Service context over the fake repositories with caller-chosen Discord adapters
pub fn fake_context(
    db: &Arc<FakeDb>,
    identity_provider: Arc<dyn IdentityProvider>,
    bot_api: Arc<dyn BotApi>,
) -> Result<ServiceContext> {
    let jwt = JwtService::new(TEST_JWT_SECRET, SESSION_TTL_SECS)?;
    Ok(ServiceContext::builder()
        .user_repo(db.clone())
        .motorcycle_repo(db.clone())
        .ownership_repo(db.clone())
        .timeline_repo(db.clone())
        .server_repo(db.clone())
        .server_config_repo(db.clone())
        .role_repo(db.clone())
        .visibility_repo(db.clone())
        .identity_provider(identity_provider)
        .bot_api(bot_api)
        .jwt_service(Arc::new(jwt))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(2)))
        .build()?)
}

// ============================================================================
// In-process app
// ============================================================================

/// Router wired to in-memory fakes
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: Arc<FakeDb>,
    pub idp: Arc<FakeIdentityProvider>,
    pub bot: Arc<FakeBotApi>,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    /// Build with extra configuration variables
    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        Self::build(overrides, false)
    }

    /// Build with a lazily connecting pool for `DATABASE_URL`, so the health
    /// check pings a real (possibly unreachable) database
    pub fn with_lazy_pool(overrides: &[(&str, &str)]) -> Self {
        Self::build(overrides, true)
    }

    fn build(overrides: &[(&str, &str)], with_pool: bool) -> Self {
        let upload_dir = temp_upload_dir();
        let config =
            config_with(&upload_dir, overrides).unwrap_or_else(|e| panic!("test config: {e}"));
        let pool = with_pool.then(|| {
            create_lazy_pool(&config.database).unwrap_or_else(|e| panic!("test pool: {e}"))
        });

        let db = FakeDb::new();
        let idp = Arc::new(FakeIdentityProvider::default());
        let bot = Arc::new(FakeBotApi::default());
        let ctx = fake_context(&db, idp.clone(), bot.clone())
            .unwrap_or_else(|e| panic!("test service context: {e}"));

        let state =
            AppState::new(ctx, config, pool).unwrap_or_else(|e| panic!("test app state: {e}"));
        let router = create_app(state.clone());

        Self {
            router,
            state,
            db,
            idp,
            bot,
            upload_dir,
        }
    }

    /// Store a user as if they had signed in before
    pub fn seed_user(&self, discord_id: &str, username: &str) -> User {
        let profile = DiscordProfile {
            id: discord_id.to_string(),
            username: username.to_string(),
            discriminator: None,
            avatar: None,
            email: None,
        };
        let tokens = DiscordTokens {
            access_token: "seeded".to_string(),
            refresh_token: None,
        };
        let user = User::from_discord(self.state.service_context().generate_id(), &profile, &tokens);
        self.db.add_user(user.clone());
        user
    }

    /// A valid session token for `user_id`
    pub fn session_for(&self, user_id: Snowflake) -> String {
        self.state
            .jwt_service()
            .issue(user_id)
            .map(|s| s.token)
            .unwrap_or_else(|e| panic!("issue test session: {e}"))
    }

    /// Send one request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| match e {});
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("read response body: {e}"));
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Buffered response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Every `Set-Cookie` header value
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// The full `Set-Cookie` line for `name`
    pub fn set_cookie(&self, name: &str) -> Option<&str> {
        let prefix = format!("{name}=");
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with(&prefix))
    }

    /// `name=value` of a set cookie, ready for a `Cookie` request header
    pub fn cookie_pair(&self, name: &str) -> Option<String> {
        self.set_cookie(name)
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }

    pub fn error_code(&self) -> String {
        self.json()["error"]["code"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

// ============================================================================
// Request builders
// ============================================================================

/// How a request proves the session
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    /// A `name=value` cookie pair
    Cookie(&'a str),
}

fn builder(method: Method, uri: &str, auth: Auth<'_>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match auth {
        Auth::None => builder,
        Auth::Bearer(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        Auth::Cookie(pair) => builder.header(header::COOKIE, pair),
    }
}

fn finish(builder: axum::http::request::Builder, body: Body) -> Request<Body> {
    builder
        .body(body)
        .unwrap_or_else(|e| panic!("build request: {e}"))
}

pub fn get(uri: &str, auth: Auth<'_>) -> Request<Body> {
    finish(builder(Method::GET, uri, auth), Body::empty())
}

pub fn delete(uri: &str, auth: Auth<'_>) -> Request<Body> {
    finish(builder(Method::DELETE, uri, auth), Body::empty())
}

pub fn post_form(uri: &str, auth: Auth<'_>, fields: &[(&str, &str)]) -> Request<Body> {
    finish(
        builder(Method::POST, uri, auth)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
        Body::from(form_body(fields)),
    )
}

pub fn put_json(uri: &str, auth: Auth<'_>, body: &Value) -> Request<Body> {
    finish(
        builder(Method::PUT, uri, auth).header(header::CONTENT_TYPE, "application/json"),
        Body::from(body.to_string()),
    )
}

pub fn post_multipart(
    uri: &str,
    auth: Auth<'_>,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    finish(
        builder(Method::POST, uri, auth).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        ),
        Body::from(multipart_body(fields, file)),
    )
}

/// Value of a query parameter in a redirect target
pub fn query_param(location: &str, name: &str) -> Option<String> {
    let query = location.split_once('?')?.1;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

// ============================================================================
// Live server
// ============================================================================

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a Postgres-backed server on an ephemeral port
    pub async fn start() -> Result<Self> {
        Self::start_with_config(live_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            addr,
            state,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a form POST with a bearer token
    pub async fn post_form_auth(
        &self,
        path: &str,
        token: &str,
        fields: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE.as_str(), "application/x-www-form-urlencoded")
            .body(form_body(fields))
            .send()
            .await?)
    }
}

/// Environment-backed configuration for live tests
pub fn live_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    let upload_dir = temp_upload_dir();
    let database_url = std::env::var("DATABASE_URL")?;
    config_with(&upload_dir, &[("DATABASE_URL", database_url.as_str())])
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json(
    response: reqwest::Response,
    expected_status: reqwest::StatusCode,
) -> Result<Value> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(
    response: reqwest::Response,
    expected_status: reqwest::StatusCode,
) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
