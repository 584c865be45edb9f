//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything in here is built once at startup and is cheap to clone:
//! the pool and every store are reference counted.

use crate::auth::{CredentialStore, JwtService, RevocationLedger};
use crate::config::AppConfig;
use crate::repositories::{PgCredentialStore, PgRevocationLedger};
use crate::services::SessionService;
use crate::storage::{FileStore, LocalFileStore};
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token issuing, verification and revocation
    pub sessions: SessionService,
    /// Resume storage
    pub files: Arc<dyn FileStore>,
    /// Prometheus render handle, absent when no recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state backed by Postgres and the configured upload directory
    ///
    /// JWT keys are derived here, so this should only be called once at
    /// application startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let users: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(db.clone()));
        let ledger: Arc<dyn RevocationLedger> = Arc::new(PgRevocationLedger::new(db.clone()));
        let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(&config.storage.upload_dir));
        Self::with_stores(db, config, users, ledger, files)
    }

    /// Create state with explicit stores
    pub fn with_stores(
        db: PgPool,
        config: AppConfig,
        users: Arc<dyn CredentialStore>,
        ledger: Arc<dyn RevocationLedger>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        let jwt = JwtService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );

        Self {
            db,
            config: Arc::new(config),
            sessions: SessionService::new(jwt, users, ledger),
            files,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    #[inline]
    pub fn files(&self) -> &dyn FileStore {
        self.files.as_ref()
    }
}
