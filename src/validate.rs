//! Request payload validation.
//!
//! Each mutating operation has one pure function that checks all of its
//! required fields together, before any store access. Missing and mistyped
//! fields are treated the same way: the whole payload is rejected with a
//! single invalid-input error, matching the all-or-nothing precondition the
//! handlers rely on.

use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, PartialEq)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub struct UpdateUser {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    /// Replaced only when supplied; absent or empty leaves the hash as is
    pub password: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct CreateNote {
    pub user: Uuid,
    pub title: String,
    pub text: String,
}

#[derive(Debug, PartialEq)]
pub struct UpdateNote {
    pub id: Uuid,
    pub user: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, PartialEq)]
pub struct Login {
    pub username: String,
    pub password: String,
}

pub fn create_user(payload: &Value) -> Result<CreateUser, ApiError> {
    let parsed = (|| {
        Some(CreateUser {
            username: non_empty_str(payload, "username")?,
            password: non_empty_str(payload, "password")?,
            roles: string_list(payload, "roles")?,
        })
    })();
    // Existing clients expect 404 here rather than 400; see DESIGN.md
    parsed.ok_or_else(|| ApiError::not_found("All fields are required"))
}

pub fn update_user(payload: &Value) -> Result<UpdateUser, ApiError> {
    let parsed = (|| {
        Some(UpdateUser {
            id: uuid_field(payload, "id")?,
            username: non_empty_str(payload, "username")?,
            roles: string_list(payload, "roles")?,
            active: bool_field(payload, "active")?,
            password: optional_password(payload)?,
        })
    })();
    parsed.ok_or_else(|| ApiError::bad_request("All fields except password are required"))
}

pub fn delete_user(payload: &Value) -> Result<Uuid, ApiError> {
    uuid_field(payload, "id").ok_or_else(|| ApiError::bad_request("User ID is required"))
}

pub fn create_note(payload: &Value) -> Result<CreateNote, ApiError> {
    let parsed = (|| {
        Some(CreateNote {
            user: uuid_field(payload, "user")?,
            title: non_empty_str(payload, "title")?,
            text: non_empty_str(payload, "text")?,
        })
    })();
    parsed.ok_or_else(|| ApiError::bad_request("Please fill all the fields"))
}

pub fn update_note(payload: &Value) -> Result<UpdateNote, ApiError> {
    let parsed = (|| {
        Some(UpdateNote {
            id: uuid_field(payload, "id")?,
            user: uuid_field(payload, "user")?,
            title: non_empty_str(payload, "title")?,
            text: non_empty_str(payload, "text")?,
            completed: bool_field(payload, "completed")?,
        })
    })();
    parsed.ok_or_else(|| ApiError::bad_request("Please fill all the fields"))
}

pub fn delete_note(payload: &Value) -> Result<Uuid, ApiError> {
    uuid_field(payload, "id").ok_or_else(|| ApiError::bad_request("Note id required"))
}

pub fn login(payload: &Value) -> Result<Login, ApiError> {
    let parsed = (|| {
        Some(Login {
            username: non_empty_str(payload, "username")?,
            password: non_empty_str(payload, "password")?,
        })
    })();
    parsed.ok_or_else(|| ApiError::bad_request("All fields are required"))
}

pub fn refresh(payload: &Value) -> Result<String, ApiError> {
    non_empty_str(payload, "token").ok_or_else(|| ApiError::bad_request("Token is required"))
}

fn non_empty_str(payload: &Value, field: &str) -> Option<String> {
    match payload.get(field)?.as_str() {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

/// An identifier must be a string that parses as a UUID; anything else cannot
/// reference a record and is rejected as invalid input.
fn uuid_field(payload: &Value, field: &str) -> Option<Uuid> {
    payload.get(field)?.as_str().and_then(|s| Uuid::parse_str(s).ok())
}

/// Strict JSON boolean; "true" the string does not count.
fn bool_field(payload: &Value, field: &str) -> Option<bool> {
    payload.get(field)?.as_bool()
}

/// Non-empty array of strings.
fn string_list(payload: &Value, field: &str) -> Option<Vec<String>> {
    let items = payload.get(field)?.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Optional password: absent or empty means "leave unchanged", any other
/// non-string value is a type error that fails the whole payload.
fn optional_password(payload: &Value) -> Option<Option<String>> {
    match payload.get("password") {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.is_empty() => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => None,
    }
}
