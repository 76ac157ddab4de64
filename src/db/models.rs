use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// bcrypt hash, never serialized into responses
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: Vec<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    /// Owning user; exposed as `user` on the wire
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

/// A note joined with its owner's username, as returned by the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct NoteWithUser {
    #[serde(flatten)]
    pub note: Note,
    pub username: String,
}
