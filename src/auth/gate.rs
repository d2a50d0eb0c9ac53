use std::sync::Arc;

use super::{AuthRejection, Identity, RevocationLedger, TokenAuthority};
use crate::database::StoreResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Authorized(Identity),
    Rejected(AuthRejection),
}

/// Decides whether a presented bearer token may pass.
///
/// The ledger is consulted before the signature: a revoked token is
/// reported as `Revoked` even while its signature and expiry still hold.
/// A ledger failure is returned as an error, never as a decision.
#[derive(Clone)]
pub struct AuthGate {
    authority: Arc<TokenAuthority>,
    ledger: Arc<dyn RevocationLedger>,
}

impl AuthGate {
    pub fn new(authority: Arc<TokenAuthority>, ledger: Arc<dyn RevocationLedger>) -> Self {
        Self { authority, ledger }
    }

    pub async fn authenticate(&self, token: Option<&str>) -> StoreResult<AuthDecision> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(AuthDecision::Rejected(AuthRejection::MissingToken)),
        };

        if self.ledger.is_revoked(token).await? {
            return Ok(AuthDecision::Rejected(AuthRejection::Revoked));
        }

        Ok(match self.authority.verify(token) {
            Ok(claims) => AuthDecision::Authorized(claims.identity()),
            Err(reason) => AuthDecision::Rejected(reason),
        })
    }
}
