//! Repository for the `users` table.

use sqlx::SqlitePool;

use crate::models::user::User;

/// Column list for `users` queries.
const COLUMNS: &str = "id, created_at";

/// Provides access to labeler identities.
pub struct UserRepo;

impl UserRepo {
    /// Register a new labeler. A duplicate id surfaces as a unique
    /// constraint violation.
    pub async fn create(pool: &SqlitePool, id: &str) -> Result<User, sqlx::Error> {
        let query = format!("INSERT INTO users (id) VALUES (?) RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query).bind(id).fetch_one(pool).await
    }

    /// Find a labeler by id.
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all registered labeler ids.
    pub async fn list_ids(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM users ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
