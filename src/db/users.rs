use sqlx::PgPool;
use uuid::Uuid;

use super::models::User;
use super::{map_unique_violation, StoreError};

/// Queries over the users table.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password, roles, active FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, roles, active FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Batch lookup used to resolve note owners in one query.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password, roles, active FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Case-insensitive username lookup, backing the duplicate check.
    pub async fn find_by_username_ci(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, roles, active FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        roles: &[String],
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, roles)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, roles, active
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(roles)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username"))
    }

    /// Full replace of username, roles, active and password hash.
    pub async fn update(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $2, password = $3, roles = $4, active = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.roles)
        .bind(user.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username"))?;
        Ok(())
    }

    /// Delete by id, returning the removed record so the response can echo
    /// its username, or None if no such user existed.
    pub async fn delete(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "DELETE FROM users WHERE id = $1 RETURNING id, username, password, roles, active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
