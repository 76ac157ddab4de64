use axum::{extract::State, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth;
use crate::config;
use crate::db::Db;
use crate::error::ApiError;
use crate::validate;

/// POST /auth/login - Verify credentials and issue a bearer token
pub async fn login(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validate::login(&payload)?;

    // Same response for unknown user, wrong password and inactive account,
    // so the endpoint does not leak which usernames exist
    let user = db
        .users()
        .find_by_username_ci(&req.username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    if !user.active || !auth::verify_password(&req.password, &user.password)? {
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    let token = auth::generate_token(&user)?;

    tracing::info!(username = %user.username, "user logged in");
    Ok(Json(token_response(token)))
}

/// POST /auth/refresh - Re-issue a token for a still-live, still-active user
pub async fn refresh(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let token = validate::refresh(&payload)?;

    let claims = auth::verify_token(&token).map_err(|e| match e {
        auth::AuthError::InvalidSecret => ApiError::from(e),
        _ => ApiError::unauthorized("Unauthorized"),
    })?;

    // The account may have been deleted or deactivated since the token was
    // issued; refuse to extend its lifetime in that case
    let user = db
        .users()
        .find_by_id(claims.sub)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let token = auth::generate_token(&user)?;
    Ok(Json(token_response(token)))
}

fn token_response(token: String) -> Value {
    let expires_in = config::config().security.jwt_expiry_hours * 3600;
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in,
    })
}
