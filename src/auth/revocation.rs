use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::StoreResult;

/// Durable record of tokens that were logged out before they expired.
///
/// Absence from the ledger only means "not revoked"; validity is still
/// decided by signature and expiry. There is deliberately no in-memory
/// fallback: if a write fails, logout fails.
#[async_trait]
pub trait RevocationLedger: Send + Sync {
    /// Idempotent. `expires_at` is the token's own expiry, kept so that
    /// stale entries can be purged later.
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> StoreResult<()>;

    async fn is_revoked(&self, token: &str) -> StoreResult<bool>;

    /// Drops entries whose token would already be rejected as expired.
    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64>;
}
