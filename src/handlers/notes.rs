use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::models::NoteWithUser;
use crate::db::Db;
use crate::error::ApiError;
use crate::validate;

/// GET /notes - List all notes, each with its owner's username
pub async fn get_all(State(db): State<Db>) -> Result<impl IntoResponse, ApiError> {
    let notes = db.notes().find_all().await?;

    // Empty collection is an error here, matching the users listing
    if notes.is_empty() {
        return Err(ApiError::bad_request("No notes found"));
    }

    // Resolve all owners in one batch query instead of one lookup per note
    let mut user_ids: Vec<Uuid> = notes.iter().map(|n| n.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let owners = db.users().find_by_ids(&user_ids).await?;
    let usernames: HashMap<Uuid, String> =
        owners.into_iter().map(|u| (u.id, u.username)).collect();

    let notes_with_user: Vec<NoteWithUser> = notes
        .into_iter()
        .map(|note| {
            let username = usernames.get(&note.user_id).cloned().unwrap_or_default();
            NoteWithUser { note, username }
        })
        .collect();

    Ok(Json(json!(notes_with_user)))
}

/// POST /notes - Create a new note for an existing user
pub async fn create(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validate::create_note(&payload)?;

    // The owner must exist before the title is even considered
    if db.users().find_by_id(req.user).await?.is_none() {
        return Err(ApiError::bad_request("User not found"));
    }

    // Fast-path duplicate check; the unique index is the backstop
    if db.notes().find_by_title_ci(&req.title).await?.is_some() {
        return Err(ApiError::conflict("Duplicate note title"));
    }

    let note = db.notes().insert(req.user, &req.title, &req.text).await?;

    tracing::info!(title = %note.title, "created note");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New note created" })),
    ))
}

/// PATCH /notes - Full replace of a note; all fields mandatory
pub async fn update(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validate::update_note(&payload)?;

    // Primary entity must exist before the duplicate check runs
    let mut note = db
        .notes()
        .find_by_id(req.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Note not found"))?;

    // A note may keep its own title; any other match is a duplicate
    if let Some(existing) = db.notes().find_by_title_ci(&req.title).await? {
        if existing.id != req.id {
            return Err(ApiError::conflict("Duplicate note title"));
        }
    }

    note.user_id = req.user;
    note.title = req.title;
    note.text = req.text;
    note.completed = req.completed;

    db.notes().update(&note).await?;

    tracing::info!(title = %note.title, "updated note");
    Ok(Json(json!({ "message": format!("'{}' updated", note.title) })))
}

/// DELETE /notes - Delete a note once its existence is confirmed
pub async fn delete(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::delete_note(&payload)?;

    let note = db
        .notes()
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Note not found"))?;

    tracing::info!(title = %note.title, "deleted note");
    Ok(Json(json!({
        "message": format!("Note '{}' with ID {} deleted", note.title, note.id)
    })))
}
