use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

pub mod models;
pub mod notes;
pub mod users;

pub use notes::NoteStore;
pub use users::UserStore;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Duplicate {0}")]
    UniqueViolation(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Postgres unique-violation SQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

/// Map a unique-index violation to `UniqueViolation(what)`, passing other
/// errors through. The index is the authoritative duplicate check; the
/// application-level lookups only exist for the fast-path error message.
pub(crate) fn map_unique_violation(err: sqlx::Error, what: &'static str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::UniqueViolation(what);
        }
    }
    StoreError::Sqlx(err)
}

/// Handle on the database, constructed once at startup and handed to the
/// router as shared state.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Connect using DATABASE_URL and the configured pool limits.
    pub async fn connect() -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connect_timeout_secs))
            .connect(&url)
            .await?;

        info!("Connected to database");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create tables and the case-insensitive unique indexes if they are not
    /// already present. Idempotent, run at every startup.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                roles TEXT[] NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL,
                title TEXT NOT NULL,
                text TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Uniqueness is case-insensitive; the indexes back the duplicate
        // checks so a check-then-act race cannot commit two spellings.
        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_username_lower_idx ON users (LOWER(username))")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS notes_title_lower_idx ON notes (LOWER(title))")
            .execute(&self.pool)
            .await?;

        info!("Database schema is up to date");
        Ok(())
    }

    pub fn users(&self) -> UserStore {
        UserStore::new(self.pool.clone())
    }

    pub fn notes(&self) -> NoteStore {
        NoteStore::new(self.pool.clone())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
