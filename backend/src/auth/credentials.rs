//! Credential store seam
//!
//! The session layer only needs a handful of lookups against user records.
//! Postgres backs them in production (`repositories::PgCredentialStore`).

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobboard_shared::Role;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Stored account
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub resume_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>>;

    /// Insert a new account; `None` when the email is already taken
    async fn insert(&self, email: &str, password_hash: &str, role: Role) -> Result<Option<UserRecord>>;

    /// Current role, read fresh from storage
    async fn role_of(&self, id: Uuid) -> Result<Option<Role>> {
        Ok(self.find_by_id(id).await?.map(|user| user.role))
    }
}

/// Process-local store for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change an account's role in place
    pub async fn set_role(&self, id: Uuid, role: Role) -> bool {
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.role = role;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: Uuid) -> Option<UserRecord> {
        self.users.write().await.remove(&id)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str, role: Role) -> Result<Option<UserRecord>> {
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == email) {
            return Ok(None);
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            resume_path: None,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(Some(user))
    }
}
