use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Db;
use crate::handlers;
use crate::middleware::jwt_auth;

/// Build the full application router around a connected database handle.
pub fn app(db: Db) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected entity APIs
        .merge(user_routes())
        .merge(note_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

fn auth_routes() -> Router<Db> {
    use handlers::auth;

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
}

fn user_routes() -> Router<Db> {
    use handlers::users;

    Router::new()
        .route(
            "/users",
            get(users::get_all)
                .post(users::create)
                .patch(users::update)
                .delete(users::delete),
        )
        .route_layer(from_fn(jwt_auth))
}

fn note_routes() -> Router<Db> {
    use handlers::notes;

    Router::new()
        .route(
            "/notes",
            get(notes::get_all)
                .post(notes::create)
                .patch(notes::update)
                .delete(notes::delete),
        )
        .route_layer(from_fn(jwt_auth))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "TechNotes API",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/auth/login, /auth/refresh (public - token acquisition)",
            "users": "/users (protected)",
            "notes": "/notes (protected)",
        }
    }))
}

async fn health(
    axum::extract::State(db): axum::extract::State<Db>,
) -> impl axum::response::IntoResponse {
    match db.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
