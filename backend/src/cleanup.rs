//! Scheduled purge of revocation ledger entries
//!
//! A revoked jti only needs to be remembered until the token it names
//! would have expired anyway. Entries older than the longest token
//! lifetime are dropped.

use crate::auth::RevocationLedger;
use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::{error, info};

/// Purge entries revoked before `now - max_lifetime`.
pub async fn run_purge(ledger: &dyn RevocationLedger, max_lifetime: Duration, now: DateTime<Utc>) -> u64 {
    match ledger.purge_revoked_before(now - max_lifetime).await {
        Ok(count) => {
            if count > 0 {
                info!("Purged {} stale revocation entries", count);
                counter!("auth_revocations_purged_total").increment(count);
            }
            count
        }
        Err(e) => {
            error!("Failed to purge revocation entries: {:#}", e);
            0
        }
    }
}

/// Spawn a background task that purges the ledger periodically.
/// Returns a handle that can be used to abort the task.
pub fn spawn_revocation_reaper(
    ledger: Arc<dyn RevocationLedger>,
    max_lifetime: Duration,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);

        loop {
            interval.tick().await;
            run_purge(ledger.as_ref(), max_lifetime, Utc::now()).await;
        }
    })
}
