//! Sign-in and bot calls through the real HTTP adapters
//!
//! A local axum app stands in for Discord and the bot process; the rest of
//! the stack runs against the in-memory repositories.
//!
//! Run with: cargo test -p integration-tests --test discord_stub_tests

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use bikenode_api::{create_app, AppState};
use bikenode_discord::{build_http_client, BotApiClient, DiscordOAuthClient};
use bikenode_service::testing::{server, FakeDb};
use integration_tests::{
    config_with, fake_context, get as get_request, post_form, query_param, temp_upload_dir, Auth,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tower::ServiceExt;

/// What the stub saw
#[derive(Default)]
struct Recorded {
    token_forms: Vec<HashMap<String, String>>,
    config_bodies: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn stub_router(recorded: Shared) -> Router {
    Router::new()
        .route(
            "/api/oauth2/token",
            post(
                |State(recorded): State<Shared>, Form(form): Form<HashMap<String, String>>| async move {
                    let code = form.get("code").cloned().unwrap_or_default();
                    recorded.lock().unwrap().token_forms.push(form);
                    if code != "good-code" {
                        return Err(StatusCode::BAD_REQUEST);
                    }
                    Ok(Json(json!({
                        "access_token": "stub-access",
                        "token_type": "Bearer",
                        "expires_in": 604_800,
                        "refresh_token": "stub-refresh",
                        "scope": "identify email guilds"
                    })))
                },
            ),
        )
        .route(
            "/api/users/@me",
            get(|headers: HeaderMap| async move {
                let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
                if auth != Some("Bearer stub-access") {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(json!({
                    "id": "424242",
                    "username": "stubrider",
                    "discriminator": "0",
                    "avatar": "a1b2",
                    "email": "stub@example.com"
                })))
            }),
        )
        .route(
            "/api/servers/:id/channels",
            get(|Path(id): Path<String>, headers: HeaderMap| async move {
                let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
                if auth != Some("Bot test-bot-token") {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                if id != "7000" {
                    return Err(StatusCode::NOT_FOUND);
                }
                Ok(Json(json!({
                    "channels": [
                        {"id": "2", "name": "rides", "type": 0, "position": 1},
                        {"id": "1", "name": "lobby", "type": 2, "position": 0},
                        {"id": "3", "name": "general", "type": 0, "position": 0}
                    ]
                })))
            }),
        )
        .route(
            "/api/servers/:id/config",
            post(
                |State(recorded): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                    recorded.lock().unwrap().config_bodies.push((id, body));
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(recorded)
}

struct StubbedApp {
    router: Router,
    state: AppState,
    db: Arc<FakeDb>,
    recorded: Shared,
}

impl StubbedApp {
    async fn start() -> Self {
        let recorded = Shared::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let stub = stub_router(recorded.clone());
        tokio::spawn(async move {
            axum::serve(listener, stub).await.unwrap();
        });

        let token_url = format!("{base}/api/oauth2/token");
        let api_base_url = format!("{base}/api");
        let config = config_with(
            &temp_upload_dir(),
            &[
                ("DISCORD_TOKEN_URL", token_url.as_str()),
                ("DISCORD_API_BASE_URL", api_base_url.as_str()),
                ("BOT_API_URL", base.as_str()),
            ],
        )
        .unwrap();

        let http = build_http_client(&config.http).unwrap();
        let idp = Arc::new(DiscordOAuthClient::new(&config.discord, http.clone()).unwrap());
        let bot = Arc::new(BotApiClient::new(&config.bot, http).unwrap());

        let db = FakeDb::new();
        let ctx = fake_context(&db, idp, bot).unwrap();

        let state = AppState::new(ctx, config, None).unwrap();
        Self {
            router: create_app(state.clone()),
            state,
            db,
            recorded,
        }
    }

    async fn send(&self, request: axum::http::Request<axum::body::Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

impl Drop for StubbedApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.state.config().upload.dir);
    }
}

fn set_cookie_pair(response: &axum::response::Response, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with(&prefix))
        .and_then(|c| c.split(';').next())
        .map(str::to_string)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login_state(app: &StubbedApp) -> (String, String) {
    let login = app.send(get_request("/login", Auth::None)).await;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    let location = login
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(location.starts_with("https://discord.com/oauth2/authorize"));
    let state = query_param(&location, "state").unwrap();
    let cookie = set_cookie_pair(&login, "oauth_state").unwrap();
    (state, cookie)
}

#[tokio::test]
async fn test_sign_in_through_oauth_stub() {
    let app = StubbedApp::start().await;
    let (state, cookie) = login_state(&app).await;

    let callback = app
        .send(get_request(
            &format!("/callback?code=good-code&state={state}"),
            Auth::Cookie(&cookie),
        ))
        .await;
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    let session = set_cookie_pair(&callback, "bikenode_session").unwrap();

    {
        let recorded = app.recorded.lock().unwrap();
        assert_eq!(recorded.token_forms.len(), 1);
        let form = &recorded.token_forms[0];
        assert_eq!(form["grant_type"], "authorization_code");
        assert_eq!(form["code"], "good-code");
        assert_eq!(form["redirect_uri"], "http://localhost:8080/callback");
    }

    let users = app.db.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].discord_id, "424242");
    assert_eq!(users[0].username, "stubrider");

    let profile = app.send(get_request("/profile", Auth::Cookie(&session))).await;
    assert_eq!(profile.status(), StatusCode::OK);
    let body = json_body(profile).await;
    assert_eq!(body["user"]["discord_id"], "424242");
    assert_eq!(body["user"]["email"], "stub@example.com");
    assert!(body["user"].get("access_token").is_none());
}

#[tokio::test]
async fn test_rejected_code_creates_no_user() {
    let app = StubbedApp::start().await;
    let (state, cookie) = login_state(&app).await;

    let callback = app
        .send(get_request(
            &format!("/callback?code=bad-code&state={state}"),
            Auth::Cookie(&cookie),
        ))
        .await;
    assert_eq!(callback.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookie_pair(&callback, "bikenode_session").is_none());
    assert!(app.db.users().is_empty());
}

#[tokio::test]
async fn test_bot_channels_and_config_notification() {
    let app = StubbedApp::start().await;
    let (state, cookie) = login_state(&app).await;
    let callback = app
        .send(get_request(
            &format!("/callback?code=good-code&state={state}"),
            Auth::Cookie(&cookie),
        ))
        .await;
    let session = set_cookie_pair(&callback, "bikenode_session").unwrap();
    app.db.add_server(server(70, "7000", "424242"));

    let channels = app
        .send(get_request("/servers/7000/channels", Auth::Cookie(&session)))
        .await;
    assert_eq!(channels.status(), StatusCode::OK);
    let body = json_body(channels).await;
    let names: Vec<_> = body["channels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["general", "rides"]);

    let updated = app
        .send(post_form(
            "/servers/7000/config",
            Auth::Cookie(&session),
            &[("create_type_roles", "on"), ("story_feed_channel_id", "2")],
        ))
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let body = json_body(updated).await;
    assert_eq!(body["notification"]["delivered"], true);

    let recorded = app.recorded.lock().unwrap();
    assert_eq!(recorded.config_bodies.len(), 1);
    let (server_id, sent) = &recorded.config_bodies[0];
    assert_eq!(server_id, "7000");
    assert_eq!(sent["create_type_roles"], true);
    assert_eq!(sent["create_brand_roles"], false);
    assert_eq!(sent["story_feed_channel_id"], "2");
}
