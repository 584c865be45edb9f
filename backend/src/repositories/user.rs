//! User repository for database operations

use crate::auth::{CredentialStore, UserRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobboard_shared::Role;
use sqlx::PgPool;
use uuid::Uuid;

/// User row as stored; the role is free text in the database
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    resume_path: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        let role = row
            .role
            .parse::<Role>()
            .with_context(|| format!("user {} has an unreadable role", row.id))?;

        Ok(UserRecord {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            resume_path: row.resume_path,
            created_at: row.created_at,
        })
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a user; `None` if the email is taken
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, role, resume_path, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_optional(pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, resume_path, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, resume_path, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    /// Read the current role only
    pub async fn role_of(pool: &PgPool, id: Uuid) -> Result<Option<Role>> {
        let role = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        role.map(|r| r.parse::<Role>().map_err(anyhow::Error::from))
            .transpose()
    }

    /// Record (or clear) the stored resume path
    pub async fn set_resume_path(pool: &PgPool, id: Uuid, path: Option<&str>) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET resume_path = $2 WHERE id = $1")
            .bind(id)
            .bind(path)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// [`CredentialStore`] backed by the `users` table
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        UserRepository::find_by_email(&self.pool, email).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        UserRepository::find_by_id(&self.pool, id).await
    }

    async fn insert(&self, email: &str, password_hash: &str, role: Role) -> Result<Option<UserRecord>> {
        UserRepository::create(&self.pool, email, password_hash, role).await
    }

    async fn role_of(&self, id: Uuid) -> Result<Option<Role>> {
        UserRepository::role_of(&self.pool, id).await
    }
}
