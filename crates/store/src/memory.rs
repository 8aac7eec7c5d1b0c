use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{Result, StoreError, User, UserStore};

/// In-memory user store. Backs unit tests and runs that need no
/// database setup; not durable.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: HashMap<i64, User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User> {
        let mut inner = self.inner.write().unwrap();

        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            token_version: 0,
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn increment_token_version(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.token_version += 1;
        Ok(())
    }
}
