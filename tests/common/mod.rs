use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use once_cell::sync::Lazy;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;
use uuid::Uuid;

use technotes_api::auth;
use technotes_api::db::models::User;
use technotes_api::db::Db;
use technotes_api::routes;

// Tests in one binary share the database, so they take turns
static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Build the app against the database named by TEST_DATABASE_URL, with a
/// clean schema. Returns None (and the caller skips) when no test database
/// is configured, so the suite stays green on machines without Postgres.
/// The returned guard serializes tests that would otherwise race on the
/// shared tables.
pub async fn test_app() -> Option<(Router, Db, MutexGuard<'static, ()>)> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping integration test");
        return None;
    };

    let guard = DB_LOCK.lock().await;

    // Must be in place before the config singleton is first touched
    std::env::set_var("JWT_SECRET", "integration-secret");
    std::env::set_var("DATABASE_URL", &url);

    let db = Db::connect().await.expect("connect to test database");
    db.migrate().await.expect("migrate test database");

    sqlx::query("TRUNCATE users, notes")
        .execute(db.pool())
        .await
        .expect("truncate test tables");

    Some((routes::app(db.clone()), db, guard))
}

/// Mint a bearer token without going through /auth/login. The middleware
/// only checks the signature, not the database.
pub fn bearer_token() -> String {
    let user = User {
        id: Uuid::new_v4(),
        username: "test-runner".to_string(),
        password: String::new(),
        roles: vec!["Admin".to_string()],
        active: true,
    };
    auth::generate_token(&user).expect("generate test token")
}

pub async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();

    let bytes = response.into_body().collect().await.expect("read body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}
