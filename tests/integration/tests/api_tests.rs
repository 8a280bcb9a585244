//! API integration tests against PostgreSQL
//!
//! Skipped unless `DATABASE_URL` points at a scratch database.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use bikenode_core::{DiscordProfile, DiscordTokens, User, UserRepository};
use bikenode_db::PgUserRepository;
use bikenode_service::MotorcycleService;
use integration_tests::{
    assert_json, assert_status, check_test_env, unique_catalog_row, unique_suffix, TestServer,
};
use reqwest::StatusCode;

/// Insert a user straight through the repository and mint a session for them
async fn signed_in_user(server: &TestServer) -> (User, String) {
    let suffix = unique_suffix();
    let discord_id = format!("9{}{suffix}", std::process::id());
    let profile = DiscordProfile {
        id: discord_id,
        username: format!("rider{suffix}"),
        discriminator: None,
        avatar: None,
        email: None,
    };
    let tokens = DiscordTokens {
        access_token: "live-test".to_string(),
        refresh_token: None,
    };
    let user = User::from_discord(server.state.service_context().generate_id(), &profile, &tokens);

    let pool = server.state.pool().cloned().expect("live server has a pool");
    let (user, created) = PgUserRepository::new(pool)
        .upsert_by_discord_id(&user)
        .await
        .expect("Failed to insert user");
    assert!(created);

    let token = server
        .state
        .jwt_service()
        .issue(user.id)
        .expect("Failed to issue session")
        .token;
    (user, token)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body = assert_json(response, StatusCode::OK)
        .await
        .expect("Health check failed");

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_import_then_search() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let make = format!("Make{}", unique_suffix());
    let first = unique_catalog_row(2022, &make);
    let second = unique_catalog_row(2023, &make);

    let catalog = MotorcycleService::new(server.state.service_context());
    let summary = catalog
        .import_catalog(vec![first.clone(), second.clone(), first.clone()])
        .await
        .expect("Import failed");
    assert_eq!(summary.received, 3);
    assert_eq!(summary.inserted, 2);

    // second load of the same rows inserts nothing
    let again = catalog
        .import_catalog(vec![first.clone()])
        .await
        .expect("Import failed");
    assert_eq!(again.inserted, 0);

    let response = server
        .get(&format!("/api/motorcycles?make={}", make.to_uppercase()))
        .await
        .expect("Request failed");
    let body = assert_json(response, StatusCode::OK)
        .await
        .expect("Search failed");
    assert_eq!(body["total"], 2);
    // newest first
    assert_eq!(body["motorcycles"][0]["year"], 2023);
    assert_eq!(body["motorcycles"][1]["model"], first.model.as_str());
}

// ============================================================================
// Garage
// ============================================================================

#[tokio::test]
async fn test_profile_requires_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/profile").await.expect("Request failed");
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .expect("Expected 401");
}

#[tokio::test]
async fn test_add_and_end_ownership() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_user, token) = signed_in_user(&server).await;

    let make = format!("Make{}", unique_suffix());
    MotorcycleService::new(server.state.service_context())
        .import_catalog(vec![unique_catalog_row(2021, &make)])
        .await
        .expect("Import failed");
    let search = server
        .get(&format!("/api/motorcycles?make={make}"))
        .await
        .expect("Request failed");
    let search = assert_json(search, StatusCode::OK).await.expect("Search failed");
    let motorcycle_id = search["motorcycles"][0]["id"].as_str().unwrap().to_string();

    let form = [
        ("motorcycle_id", motorcycle_id.as_str()),
        ("purchase_date", "2021-03-14"),
    ];
    let added = server
        .post_form_auth("/profile/bikes/add", &token, &form)
        .await
        .expect("Request failed");
    let added = assert_json(added, StatusCode::CREATED)
        .await
        .expect("Add failed");
    let ownership_id = added["id"].as_str().unwrap().to_string();

    // the partial unique index rejects a second active row
    let duplicate = server
        .post_form_auth("/profile/bikes/add", &token, &form)
        .await
        .expect("Request failed");
    assert_status(duplicate, StatusCode::CONFLICT)
        .await
        .expect("Expected 409");

    let ended = server
        .post_form_auth(
            &format!("/profile/bikes/{ownership_id}/end"),
            &token,
            &[("end_date", "2024-02-01"), ("end_reason", "traded in")],
        )
        .await
        .expect("Request failed");
    let ended = assert_json(ended, StatusCode::OK).await.expect("End failed");
    assert_eq!(ended["is_active"], false);

    let rebought = server
        .post_form_auth("/profile/bikes/add", &token, &form)
        .await
        .expect("Request failed");
    assert_status(rebought, StatusCode::CREATED)
        .await
        .expect("Re-add after end failed");

    let profile = server
        .get_auth("/profile", &token)
        .await
        .expect("Request failed");
    let profile = assert_json(profile, StatusCode::OK)
        .await
        .expect("Profile failed");
    assert_eq!(profile["ownerships"].as_array().unwrap().len(), 2);
}
