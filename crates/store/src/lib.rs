//! User persistence for the auth core.
//!
//! Provides:
//! - The `UserStore` contract the auth service is written against
//! - A SQLite-backed implementation (`SqliteUserStore`)
//! - An in-memory implementation (`MemoryUserStore`) for tests and
//!   zero-setup runs

pub mod memory;
pub mod model;
pub mod sqlite;

pub use memory::MemoryUserStore;
pub use model::User;
pub use sqlite::{SqliteUserStore, run_migrations};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Contract the auth core requires from persistent user storage.
///
/// Every operation is atomic with respect to a single user row; no
/// cross-user transactions are needed.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Insert a new user with `token_version` 0. Fails with
    /// [`StoreError::DuplicateEmail`] if the email is already registered.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User>;

    /// Bump the user's token version, invalidating every refresh
    /// credential issued under the previous version.
    async fn increment_token_version(&self, id: i64) -> Result<()>;
}
