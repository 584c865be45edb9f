//! Revocation ledger
//!
//! Records the jti of every token invalidated before its natural expiry.
//! The ledger only grows, apart from the reaper removing records for tokens
//! that can no longer verify anyway.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Durable set of revoked token ids
///
/// Implementations must give read-after-write consistency: once `revoke`
/// returns `Ok`, every later `is_revoked` for that jti returns `true`.
#[async_trait]
pub trait RevocationLedger: Send + Sync {
    /// Record `jti` as revoked. Revoking the same jti again is a no-op.
    async fn revoke(&self, jti: &str, now: DateTime<Utc>) -> Result<()>;

    async fn is_revoked(&self, jti: &str) -> Result<bool>;

    /// Drop records revoked before `cutoff`, returning how many went
    async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

/// Process-local ledger for tests and single-node development
#[derive(Debug, Default)]
pub struct InMemoryRevocationLedger {
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryRevocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }
}

#[async_trait]
impl RevocationLedger for InMemoryRevocationLedger {
    async fn revoke(&self, jti: &str, now: DateTime<Utc>) -> Result<()> {
        self.revoked
            .write()
            .await
            .entry(jti.to_string())
            .or_insert(now);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool> {
        Ok(self.revoked.read().await.contains_key(jti))
    }

    async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut revoked = self.revoked.write().await;
        let before = revoked.len();
        revoked.retain(|_, revoked_at| *revoked_at >= cutoff);
        Ok((before - revoked.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_revoke_then_visible() {
        let ledger = InMemoryRevocationLedger::new();
        assert!(!ledger.is_revoked("abc").await.unwrap());

        ledger.revoke("abc", Utc::now()).await.unwrap();

        assert!(ledger.is_revoked("abc").await.unwrap());
        assert!(!ledger.is_revoked("abd").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let ledger = InMemoryRevocationLedger::new();
        let first = Utc::now();

        ledger.revoke("abc", first).await.unwrap();
        ledger.revoke("abc", first + Duration::seconds(5)).await.unwrap();

        assert_eq!(ledger.len().await, 1);
        assert!(ledger.is_revoked("abc").await.unwrap());
        // The first revocation time is kept.
        assert_eq!(ledger.purge_revoked_before(first + Duration::seconds(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_keeps_recent_records() {
        let ledger = InMemoryRevocationLedger::new();
        let now = Utc::now();

        ledger.revoke("old", now - Duration::days(40)).await.unwrap();
        ledger.revoke("new", now).await.unwrap();

        let purged = ledger.purge_revoked_before(now - Duration::days(30)).await.unwrap();

        assert_eq!(purged, 1);
        assert!(!ledger.is_revoked("old").await.unwrap());
        assert!(ledger.is_revoked("new").await.unwrap());
    }
}
