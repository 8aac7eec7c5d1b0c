use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted user record.
///
/// `token_version` starts at 0 and only ever increases; a refresh
/// credential is valid only while it carries the current value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub token_version: i64,
}
