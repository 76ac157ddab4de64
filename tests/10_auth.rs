mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let Some((app, _db, _guard)) = common::test_app().await else { return };

    let (status, body) = common::request(&app, "GET", "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing Authorization header");

    let (status, _) = common::request(&app, "GET", "/notes", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Public endpoints stay reachable without a token
    let (status, _) = common::request(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_and_refresh_flow() {
    let Some((app, _db, _guard)) = common::test_app().await else { return };
    let token = common::bearer_token();

    // Seed a user through the API itself
    let (status, _) = common::request(
        &app,
        "POST",
        "/users",
        Some(&token),
        Some(json!({ "username": "hank", "password": "pw123456", "roles": ["Employee"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Missing fields short-circuit before any credential check
    let (status, body) =
        common::request(&app, "POST", "/auth/login", None, Some(json!({ "username": "hank" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    // Wrong password is a plain 401
    let (status, _) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "hank", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Correct credentials yield a usable access token
    let (status, body) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "hank", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    let access_token = body["access_token"].as_str().expect("access_token").to_string();

    let (status, _) = common::request(&app, "GET", "/users", Some(&access_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Refresh re-issues a token for the same account
    let (status, body) = common::request(
        &app,
        "POST",
        "/auth/refresh",
        None,
        Some(json!({ "token": access_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn login_is_refused_for_inactive_user() {
    let Some((app, _db, _guard)) = common::test_app().await else { return };
    let token = common::bearer_token();

    let (status, _) = common::request(
        &app,
        "POST",
        "/users",
        Some(&token),
        Some(json!({ "username": "mabel", "password": "pw123456", "roles": ["Employee"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Find her id, then deactivate her through the API
    let (_, users) = common::request(&app, "GET", "/users", Some(&token), None).await;
    let mabel = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "mabel")
        .expect("mabel listed")
        .clone();

    let (status, _) = common::request(
        &app,
        "PATCH",
        "/users",
        Some(&token),
        Some(json!({
            "id": mabel["id"],
            "username": "mabel",
            "roles": ["Employee"],
            "active": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "mabel", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
