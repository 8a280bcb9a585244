//! HTTP surface tests against in-memory fakes
//!
//! Every request goes through the real router and middleware stack.
//!
//! Run with: cargo test -p integration-tests --test router_tests

use axum::http::StatusCode;
use bikenode_core::{Permissions, UpstreamError};
use bikenode_service::testing::{channel, motorcycle, role, server};
use integration_tests::{
    delete, get, post_form, post_multipart, put_json, query_param, Auth, TestApp,
};
use serde_json::json;

/// Walk `/login` then `/callback` and return the callback response
async fn sign_in(app: &TestApp, code: &str) -> integration_tests::TestResponse {
    let login = app.send(get("/login", Auth::None)).await;
    assert_eq!(login.status, StatusCode::SEE_OTHER);
    let location = login.header("location").unwrap().to_string();
    let state = query_param(&location, "state").unwrap();
    let state_cookie = login.cookie_pair("oauth_state").unwrap();

    app.send(get(
        &format!("/callback?code={code}&state={state}"),
        Auth::Cookie(&state_cookie),
    ))
    .await
}

// ============================================================================
// Health & middleware
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let response = app.send(get("/health", Auth::None)).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"], "healthy");
}

#[tokio::test]
async fn test_health_degraded_when_database_unreachable() {
    let app = TestApp::with_lazy_pool(&[
        ("DATABASE_URL", "postgres://bikenode@127.0.0.1:1/bikenode"),
        ("DATABASE_MIN_CONNECTIONS", "0"),
        ("DATABASE_ACQUIRE_TIMEOUT_SECS", "1"),
    ]);
    let response = app.send(get("/health", Auth::None)).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    let body = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["database"], "unhealthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let app = TestApp::new();
    let response = app.send(get("/api/motorcycles", Auth::None)).await;
    assert!(response.header("x-request-id").is_some());
}

// ============================================================================
// Login flow
// ============================================================================

#[tokio::test]
async fn test_login_redirects_with_state_cookie() {
    let app = TestApp::new();
    let response = app.send(get("/login", Auth::None)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let location = response.header("location").unwrap();
    assert!(location.starts_with("https://discord.test/oauth2/authorize"));
    let state = query_param(location, "state").unwrap();
    assert_eq!(state.len(), 32);

    let cookie = response.set_cookie("oauth_state").unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    // signed, so the raw state is not the cookie value
    assert_ne!(
        response.cookie_pair("oauth_state").unwrap(),
        format!("oauth_state={state}")
    );
}

#[tokio::test]
async fn test_callback_creates_then_updates_single_user() {
    let app = TestApp::new();

    app.idp.respond_with("999", "alice");
    let first = sign_in(&app, "abc123").await;
    assert_eq!(first.status, StatusCode::SEE_OTHER);
    assert_eq!(first.header("location"), Some("/profile"));

    let session = first.set_cookie("bikenode_session").unwrap();
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("SameSite=Lax"));
    assert!(session.contains("Path=/"));
    assert!(session.contains("Max-Age=604800"));
    assert!(!session.contains("Secure"));

    let users = app.db.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].discord_id, "999");
    assert_eq!(users[0].username, "alice");

    app.idp.respond_with("999", "alice2");
    let second = sign_in(&app, "abc123").await;
    assert_eq!(second.status, StatusCode::SEE_OTHER);

    let users = app.db.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "alice2");
    assert_eq!(app.idp.codes(), vec!["abc123", "abc123"]);
}

#[tokio::test]
async fn test_session_cookie_opens_profile() {
    let app = TestApp::new();
    app.idp.respond_with("999", "alice");
    let callback = sign_in(&app, "abc123").await;
    let session = callback.cookie_pair("bikenode_session").unwrap();

    let profile = app.send(get("/profile", Auth::Cookie(&session))).await;
    assert_eq!(profile.status, StatusCode::OK);
    let body = profile.json();
    assert_eq!(body["user"]["discord_id"], "999");
    assert_eq!(body["ownerships"], json!([]));

    let logout = app.send(get("/logout", Auth::Cookie(&session))).await;
    assert_eq!(logout.status, StatusCode::SEE_OTHER);
    assert_eq!(logout.header("location"), Some("/"));
    let cleared = logout.set_cookie("bikenode_session").unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let app = TestApp::new();
    app.idp.respond_with("999", "alice");

    let login = app.send(get("/login", Auth::None)).await;
    let state_cookie = login.cookie_pair("oauth_state").unwrap();

    let response = app
        .send(get(
            "/callback?code=abc123&state=forged",
            Auth::Cookie(&state_cookie),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.db.users().is_empty());
    assert!(app.idp.codes().is_empty());
}

#[tokio::test]
async fn test_callback_without_state_cookie() {
    let app = TestApp::new();
    let response = app
        .send(get("/callback?code=abc123&state=anything", Auth::None))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_upstream_failure_is_500() {
    let app = TestApp::new();
    app.idp.fail_with(UpstreamError::Status {
        service: "discord",
        status: 400,
    });

    let response = sign_in(&app, "abc123").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_code(), "UPSTREAM_FAILURE");
    assert_eq!(response.json()["error"]["message"], "Internal server error");
    assert!(app.db.users().is_empty());
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_profile_requires_session() {
    let app = TestApp::new();

    let missing = app.send(get("/profile", Auth::None)).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "UNAUTHORIZED");

    let garbage = app.send(get("/profile", Auth::Bearer("not-a-jwt"))).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    // an unsigned cookie carrying a real token is ignored
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);
    let forged = format!("bikenode_session={token}");
    let unsigned = app.send(get("/profile", Auth::Cookie(&forged))).await;
    assert_eq!(unsigned.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_opens_profile() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);

    let response = app.send(get("/profile", Auth::Bearer(&token))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["user"]["username"], "rider");
}

// ============================================================================
// Garage
// ============================================================================

#[tokio::test]
async fn test_add_conflict_remove_readd() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);
    app.db.add_motorcycle(motorcycle(5, 2019, "Kawasaki", "Z900"));

    let form = [
        ("motorcycle_id", "5"),
        ("purchase_date", "2019-05-01"),
        ("notes", "first bike"),
    ];
    let added = app
        .send(post_form("/profile/bikes/add", Auth::Bearer(&token), &form))
        .await;
    assert_eq!(added.status, StatusCode::CREATED);
    let ownership_id = added.json()["id"].as_str().unwrap().to_string();
    assert_eq!(added.json()["motorcycle"]["display_name"], "2019 Kawasaki Z900");

    let duplicate = app
        .send(post_form("/profile/bikes/add", Auth::Bearer(&token), &form))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let removed = app
        .send(post_form(
            &format!("/profile/bikes/{ownership_id}/remove"),
            Auth::Bearer(&token),
            &[],
        ))
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let readded = app
        .send(post_form("/profile/bikes/add", Auth::Bearer(&token), &form))
        .await;
    assert_eq!(readded.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_add_unknown_motorcycle_is_404() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);

    let response = app
        .send(post_form(
            "/profile/bikes/add",
            Auth::Bearer(&token),
            &[("motorcycle_id", "404"), ("purchase_date", "2020-01-01")],
        ))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_with_bad_date_is_400() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);

    let response = app
        .send(post_form(
            "/profile/bikes/add",
            Auth::Bearer(&token),
            &[("motorcycle_id", "5"), ("purchase_date", "05/01/2019")],
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_end_and_list_inactive() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);
    app.db.add_motorcycle(motorcycle(5, 2019, "Kawasaki", "Z900"));

    let added = app
        .send(post_form(
            "/profile/bikes/add",
            Auth::Bearer(&token),
            &[("motorcycle_id", "5"), ("purchase_date", "2019-05-01")],
        ))
        .await;
    let ownership_id = added.json()["id"].as_str().unwrap().to_string();
    let end_uri = format!("/profile/bikes/{ownership_id}/end");

    let too_early = app
        .send(post_form(
            &end_uri,
            Auth::Bearer(&token),
            &[("end_date", "2018-01-01")],
        ))
        .await;
    assert_eq!(too_early.status, StatusCode::BAD_REQUEST);

    let ended = app
        .send(post_form(
            &end_uri,
            Auth::Bearer(&token),
            &[("end_date", "2023-08-01"), ("end_reason", "sold")],
        ))
        .await;
    assert_eq!(ended.status, StatusCode::OK);
    assert_eq!(ended.json()["is_active"], false);

    let active = app
        .send(get("/api/user/motorcycles", Auth::Bearer(&token)))
        .await;
    assert_eq!(active.json(), json!([]));

    let all = app
        .send(get(
            "/api/user/motorcycles?include_inactive=true",
            Auth::Bearer(&token),
        ))
        .await;
    assert_eq!(all.json().as_array().unwrap().len(), 1);
    assert_eq!(all.json()[0]["end_reason"], "sold");
}

#[tokio::test]
async fn test_other_users_ownership_is_forbidden() {
    let app = TestApp::new();
    let owner = app.seed_user("1", "owner");
    let intruder = app.seed_user("2", "intruder");
    app.db.add_motorcycle(motorcycle(5, 2019, "Kawasaki", "Z900"));

    let added = app
        .send(post_form(
            "/profile/bikes/add",
            Auth::Bearer(&app.session_for(owner.id)),
            &[("motorcycle_id", "5"), ("purchase_date", "2019-05-01")],
        ))
        .await;
    let ownership_id = added.json()["id"].as_str().unwrap().to_string();

    let response = app
        .send(post_form(
            &format!("/profile/bikes/{ownership_id}/remove"),
            Auth::Bearer(&app.session_for(intruder.id)),
            &[],
        ))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let bad_id = app
        .send(post_form(
            "/profile/bikes/not-a-number/remove",
            Auth::Bearer(&app.session_for(owner.id)),
            &[],
        ))
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Timeline
// ============================================================================

#[tokio::test]
async fn test_timeline_upload_update_delete() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);
    app.db.add_motorcycle(motorcycle(5, 2019, "Kawasaki", "Z900"));
    app.db.add_server(server(70, "7000", "1"));

    let added = app
        .send(post_form(
            "/profile/bikes/add",
            Auth::Bearer(&token),
            &[("motorcycle_id", "5"), ("purchase_date", "2019-05-01")],
        ))
        .await;
    let ownership_id = added.json()["id"].as_str().unwrap().to_string();

    let created = app
        .send(post_multipart(
            "/profile/timeline/add",
            Auth::Bearer(&token),
            &[
                ("ownership_id", ownership_id.as_str()),
                ("event_type", "maintenance"),
                ("date", "2019-06-01"),
                ("title", "Oil change"),
                ("is_public", "on"),
                ("shared_to_servers", "70"),
            ],
            Some(("media", "oil.JPG", b"fake-jpeg-bytes".as_slice())),
        ))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    let event = created.json();
    assert_eq!(event["event_type"], "MAINTENANCE");
    assert_eq!(event["is_public"], true);
    assert_eq!(event["shared_to_servers"], json!(["70"]));

    let media_url = event["media_url"].as_str().unwrap().to_string();
    let file_name = media_url.strip_prefix("/uploads/").unwrap().to_string();
    assert!(file_name.ends_with(".jpg"));
    assert!(app.upload_dir.join(&file_name).exists());

    let served = app.send(get(&media_url, Auth::None)).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(&served.body[..], b"fake-jpeg-bytes");

    let event_uri = format!("/profile/timeline/{}", event["id"].as_str().unwrap());
    let updated = app
        .send(put_json(
            &event_uri,
            Auth::Bearer(&token),
            &json!({"title": "Oil and filter", "shared_to_servers": []}),
        ))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["title"], "Oil and filter");
    assert_eq!(updated.json()["shared_to_servers"], json!([]));
    assert_eq!(updated.json()["media_url"], media_url.as_str());

    let deleted = app.send(delete(&event_uri, Auth::Bearer(&token))).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(!app.upload_dir.join(&file_name).exists());
    assert_eq!(app.db.event_count(), 0);
}

#[tokio::test]
async fn test_timeline_rejects_disallowed_media() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);

    let response = app
        .send(post_multipart(
            "/profile/timeline/add",
            Auth::Bearer(&token),
            &[
                ("ownership_id", "1"),
                ("event_type", "photo"),
                ("date", "2019-06-01"),
                ("title", "Shot"),
            ],
            Some(("media", "script.sh", b"#!/bin/sh".as_slice())),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_UPLOAD");
}

#[tokio::test]
async fn test_timeline_rejects_oversized_media() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);
    let big = vec![0u8; 65_537];

    let response = app
        .send(post_multipart(
            "/profile/timeline/add",
            Auth::Bearer(&token),
            &[
                ("ownership_id", "1"),
                ("event_type", "photo"),
                ("date", "2019-06-01"),
                ("title", "Huge"),
            ],
            Some(("media", "huge.png", big.as_slice())),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_UPLOAD");
}

#[tokio::test]
async fn test_failed_event_discards_upload() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);

    // ownership 12345 does not exist
    let response = app
        .send(post_multipart(
            "/profile/timeline/add",
            Auth::Bearer(&token),
            &[
                ("ownership_id", "12345"),
                ("event_type", "photo"),
                ("date", "2019-06-01"),
                ("title", "Orphan"),
            ],
            Some(("media", "orphan.png", b"png".as_slice())),
        ))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let leftovers = std::fs::read_dir(&app.upload_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}

// ============================================================================
// Servers
// ============================================================================

#[tokio::test]
async fn test_server_config_defaults_then_update() {
    let app = TestApp::new();
    let owner = app.seed_user("1", "owner");
    let token = app.session_for(owner.id);
    app.db.add_server(server(70, "7000", "1"));

    let first = app
        .send(get("/servers/7000/config", Auth::Bearer(&token)))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let config = first.json();
    assert_eq!(config["create_brand_roles"], false);
    assert_eq!(config["create_type_roles"], false);
    assert_eq!(config["create_model_roles"], false);
    assert_eq!(config["story_feed_channel_id"], "");

    let second = app
        .send(get("/servers/7000/config", Auth::Bearer(&token)))
        .await;
    assert_eq!(second.json()["id"], config["id"]);
    assert_eq!(app.db.config_count(), 1);

    let updated = app
        .send(post_form(
            "/servers/7000/config",
            Auth::Bearer(&token),
            &[
                ("create_brand_roles", "on"),
                ("story_feed_channel_id", "123456789"),
            ],
        ))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    let body = updated.json();
    assert_eq!(body["config"]["create_brand_roles"], true);
    assert_eq!(body["config"]["create_type_roles"], false);
    assert_eq!(body["config"]["story_feed_channel_id"], "123456789");
    assert_eq!(body["notification"]["delivered"], true);
    assert_eq!(app.bot.notifications().len(), 1);
    assert_eq!(app.bot.notifications()[0].0, "7000");
}

#[tokio::test]
async fn test_server_config_notification_failure_is_partial_success() {
    let app = TestApp::new();
    let owner = app.seed_user("1", "owner");
    let token = app.session_for(owner.id);
    app.db.add_server(server(70, "7000", "1"));
    app.bot.fail_notify_with(UpstreamError::Network {
        service: "bot",
        message: "connection refused".to_string(),
    });

    let response = app
        .send(post_form(
            "/servers/7000/config",
            Auth::Bearer(&token),
            &[("create_model_roles", "on")],
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["config"]["create_model_roles"], true);
    assert_eq!(body["notification"]["delivered"], false);
    assert!(body["notification"]["error"].is_string());

    let reread = app
        .send(get("/servers/7000/config", Auth::Bearer(&token)))
        .await;
    assert_eq!(reread.json()["create_model_roles"], true);
}

#[tokio::test]
async fn test_server_config_requires_admin() {
    let app = TestApp::new();
    let member = app.seed_user("2", "member");
    let moderator = app.seed_user("3", "moderator");
    app.db.add_server(server(70, "7000", "1"));
    app.db.add_role(role(member.id, 70, Permissions::KICK_MEMBERS));
    app.db.add_role(role(moderator.id, 70, Permissions::MANAGE_GUILD));

    let denied = app
        .send(get(
            "/servers/7000/config",
            Auth::Bearer(&app.session_for(member.id)),
        ))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(app.db.config_count(), 0);

    let allowed = app
        .send(get(
            "/servers/7000/config",
            Auth::Bearer(&app.session_for(moderator.id)),
        ))
        .await;
    assert_eq!(allowed.status, StatusCode::OK);

    let unknown = app
        .send(get(
            "/servers/404/config",
            Auth::Bearer(&app.session_for(moderator.id)),
        ))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_channels_are_text_only() {
    let app = TestApp::new();
    let owner = app.seed_user("1", "owner");
    let token = app.session_for(owner.id);
    app.db.add_server(server(70, "7000", "1"));
    app.bot.set_channels(vec![
        channel("3", "news", 5, 2),
        channel("1", "general", 0, 0),
        channel("2", "voice", 2, 1),
        channel("4", "category", 4, 3),
    ]);

    let response = app
        .send(get("/servers/7000/channels", Auth::Bearer(&token)))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<_> = response.json()["channels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["general", "news"]);
}

#[tokio::test]
async fn test_visibility_round_trip() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);
    app.db.add_server(server(70, "7000", "99"));
    app.db.add_role(role(user.id, 70, Permissions::empty()));

    let listed = app.send(get("/api/user/servers", Auth::Bearer(&token))).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json()[0]["is_visible"], true);
    assert_eq!(listed.json()[0]["is_admin"], false);

    let hidden = app
        .send(put_json(
            "/profile/servers/7000/visibility",
            Auth::Bearer(&token),
            &json!({"is_visible": false}),
        ))
        .await;
    assert_eq!(hidden.status, StatusCode::OK);

    let listed = app.send(get("/api/user/servers", Auth::Bearer(&token))).await;
    assert_eq!(listed.json()[0]["is_visible"], false);

    let unknown = app
        .send(put_json(
            "/profile/servers/404/visibility",
            Auth::Bearer(&token),
            &json!({"is_visible": false}),
        ))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unlinked_server_cannot_be_claimed() {
    let app = TestApp::new();
    let user = app.seed_user("1", "rider");
    let token = app.session_for(user.id);
    app.db.add_motorcycle(motorcycle(5, 2019, "Kawasaki", "Z900"));
    app.db.add_server(server(80, "8000", "99"));

    let toggled = app
        .send(put_json(
            "/profile/servers/8000/visibility",
            Auth::Bearer(&token),
            &json!({"is_visible": true}),
        ))
        .await;
    assert_eq!(toggled.status, StatusCode::FORBIDDEN);
    assert_eq!(toggled.error_code(), "NOT_SERVER_MEMBER");

    let listed = app.send(get("/api/user/servers", Auth::Bearer(&token))).await;
    assert_eq!(listed.json(), json!([]));

    let added = app
        .send(post_form(
            "/profile/bikes/add",
            Auth::Bearer(&token),
            &[("motorcycle_id", "5"), ("purchase_date", "2019-05-01")],
        ))
        .await;
    let ownership_id = added.json()["id"].as_str().unwrap().to_string();
    let shared = app
        .send(post_multipart(
            "/profile/timeline/add",
            Auth::Bearer(&token),
            &[
                ("ownership_id", ownership_id.as_str()),
                ("event_type", "trip"),
                ("date", "2019-06-01"),
                ("title", "Coast run"),
                ("shared_to_servers", "80"),
            ],
            None,
        ))
        .await;
    assert_eq!(shared.status, StatusCode::FORBIDDEN);
    assert_eq!(app.db.event_count(), 0);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_search_filters_and_coerces_paging() {
    let app = TestApp::new();
    app.db.add_motorcycle(motorcycle(1, 2020, "Honda", "CB500X"));
    app.db.add_motorcycle(motorcycle(2, 2021, "Honda", "CB500X"));
    app.db.add_motorcycle(motorcycle(3, 2021, "Yamaha", "MT-07"));

    let exact = app
        .send(get(
            "/api/motorcycles?year=2021&make=HONDA&model=cb500x",
            Auth::None,
        ))
        .await;
    assert_eq!(exact.status, StatusCode::OK);
    let body = exact.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["motorcycles"][0]["id"], "2");

    let coerced = app
        .send(get("/api/motorcycles?page=0&limit=500", Auth::None))
        .await;
    let body = coerced.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["total"], 3);

    let bad = app
        .send(get("/api/motorcycles?year=soon", Auth::None))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.error_code(), "INVALID_QUERY_PARAMETER");
}
