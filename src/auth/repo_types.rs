use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,                // system-assigned, immutable
    pub username: String,       // globally unique
    pub email: String,          // globally unique
    pub phone: Option<String>,  // optional profile field
    #[serde(skip_serializing)]
    pub password_hash: String,  // Argon2 hash, never exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime, // refreshed by trigger on any update
}
