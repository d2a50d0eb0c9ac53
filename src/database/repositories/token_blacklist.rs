use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::auth::RevocationLedger;
use crate::database::StoreResult;

/// Revocation ledger backed by the `token_blacklist` table.
#[derive(Clone)]
pub struct PgTokenBlacklist {
    pool: PgPool,
}

impl PgTokenBlacklist {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationLedger for PgTokenBlacklist {
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO token_blacklist (token, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        tracing::info!("token added to blacklist");
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> StoreResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT id FROM token_blacklist WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
