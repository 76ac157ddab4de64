use sqlx::PgPool;
use uuid::Uuid;

use super::models::Note;
use super::{map_unique_violation, StoreError};

/// Queries over the notes table.
pub struct NoteStore {
    pool: PgPool,
}

impl NoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Note>, StoreError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, user_id, title, text, completed FROM notes ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, user_id, title, text, completed FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    /// Case-insensitive title lookup, backing the duplicate check.
    pub async fn find_by_title_ci(&self, title: &str) -> Result<Option<Note>, StoreError> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, user_id, title, text, completed FROM notes WHERE LOWER(title) = LOWER($1)",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    /// Whether any note still references the given user. Backs the
    /// referential block on user deletion.
    pub async fn any_for_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM notes WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn insert(&self, user_id: Uuid, title: &str, text: &str) -> Result<Note, StoreError> {
        sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (user_id, title, text)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, text, completed
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "note title"))
    }

    /// Full replace of owner, title, text and completed.
    pub async fn update(&self, note: &Note) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE notes
            SET user_id = $2, title = $3, text = $4, completed = $5
            WHERE id = $1
            "#,
        )
        .bind(note.id)
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.text)
        .bind(note.completed)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "note title"))?;
        Ok(())
    }

    /// Delete by id, returning the removed record so the response can echo
    /// its title, or None if no such note existed.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let note = sqlx::query_as::<_, Note>(
            "DELETE FROM notes WHERE id = $1 RETURNING id, user_id, title, text, completed",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }
}
