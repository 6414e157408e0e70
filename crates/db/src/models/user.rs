//! User entity model.

use roilabel_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table. Identity is the registered email address.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: String,
    pub created_at: Timestamp,
}
