use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth;
use crate::db::Db;
use crate::error::ApiError;
use crate::validate;

/// GET /users - List all users, passwords excluded
pub async fn get_all(State(db): State<Db>) -> Result<impl IntoResponse, ApiError> {
    let users = db.users().find_all().await?;

    // An empty collection is an error here, not an empty list. Kept for
    // client compatibility; see DESIGN.md.
    if users.is_empty() {
        return Err(ApiError::bad_request("No users found"));
    }

    Ok(Json(json!(users)))
}

/// POST /users - Create a new user
pub async fn create(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validate::create_user(&payload)?;

    // Fast-path duplicate check; the unique index is the backstop
    if db.users().find_by_username_ci(&req.username).await?.is_some() {
        return Err(ApiError::conflict("Duplicate username"));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = db.users().insert(&req.username, &password_hash, &req.roles).await?;

    tracing::info!(username = %user.username, "created user");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": format!("New user {} created", user.username) })),
    ))
}

/// PATCH /users - Full replace of a user; password only if supplied
pub async fn update(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validate::update_user(&payload)?;

    // Primary entity must exist before the duplicate check runs
    let mut user = db
        .users()
        .find_by_id(req.id)
        .await?
        .ok_or_else(|| ApiError::bad_request("User not found"))?;

    // A user may keep its own username; any other match is a duplicate
    if let Some(existing) = db.users().find_by_username_ci(&req.username).await? {
        if existing.id != req.id {
            return Err(ApiError::conflict("Duplicate username"));
        }
    }

    user.username = req.username;
    user.roles = req.roles;
    user.active = req.active;
    if let Some(password) = req.password {
        user.password = auth::hash_password(&password)?;
    }

    db.users().update(&user).await?;

    tracing::info!(username = %user.username, "updated user");
    Ok(Json(json!({ "message": format!("{} updated", user.username) })))
}

/// DELETE /users - Delete a user unless notes still reference it
pub async fn delete(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::delete_user(&payload)?;

    // The referential block is checked before existence of the user itself;
    // a dangling reference surfaces as the block, not as not-found.
    if db.notes().any_for_user(id).await? {
        return Err(ApiError::bad_request("User has assigned notes"));
    }

    let user = db
        .users()
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(username = %user.username, "deleted user");
    Ok(Json(json!({
        "message": format!("Username {} with ID {} deleted", user.username, user.id)
    })))
}
