use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::{AuthRejection, Identity, RevocationLedger, TokenAuthority};
use crate::database::StoreError;
use crate::database::repositories::CredentialStore;
use crate::error::AppError;
use crate::utils::{hash_password_with_cost, verify_password};

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    #[serde(rename = "usuario")]
    pub identity: Identity,
}

/// Login and logout flows over the credential store, the token authority
/// and the revocation ledger.
///
/// A user has at most one *recorded* token: each login overwrites it. An
/// older token that has not expired stays valid until it is logged out.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn CredentialStore>,
    authority: Arc<TokenAuthority>,
    ledger: Arc<dyn RevocationLedger>,
    /// Checked against on unknown usernames so both failures cost one
    /// bcrypt verification at the stored cost.
    dummy_hash: Option<Arc<str>>,
}

impl SessionService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        authority: Arc<TokenAuthority>,
        ledger: Arc<dyn RevocationLedger>,
        password_cost: u32,
    ) -> Self {
        let dummy_hash = match hash_password_with_cost("unknown-user", password_cost) {
            Ok(hash) => Some(Arc::from(hash)),
            Err(e) => {
                warn!("no dummy password hash for cost {}: {}", password_cost, e);
                None
            }
        };

        Self {
            store,
            authority,
            ledger,
            dummy_hash,
        }
    }

    /// Unknown user and wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, usuario: &str, senha: &str) -> Result<LoginOutcome, AppError> {
        let user = self.store.find_by_username(usuario).await?;

        let stored_hash = match &user {
            Some(user) => Some(user.senha.clone()),
            None => self.dummy_hash.as_deref().map(str::to_owned),
        };
        let matches = match stored_hash {
            Some(stored_hash) => check_password(senha, stored_hash).await?,
            None => false,
        };

        let Some(user) = user else {
            info!(usuario, "login failed: unknown user");
            return Err(AppError::InvalidCredentials);
        };
        if !matches {
            info!(usuario, "login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let identity = user.identity();
        let issued = self
            .authority
            .issue(&identity)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.store
            .set_token(&user.usuario, Some(&issued.token))
            .await?;

        info!(usuario = %identity.usuario, expires_at = %issued.expires_at, "user logged in");
        Ok(LoginOutcome {
            token: issued.token,
            identity,
        })
    }

    /// Revokes `token` and clears the stored copy for its user.
    ///
    /// The claims are decoded without checking the signature: revocation
    /// keys off the literal string, so only a holder of the exact token can
    /// revoke it. Logging out an already revoked token succeeds.
    pub async fn logout(&self, token: Option<&str>) -> Result<(), AppError> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token.to_owned(),
            _ => return Err(AppError::Auth(AuthRejection::MissingToken)),
        };

        let claims = TokenAuthority::decode_unverified(&token).map_err(AppError::Auth)?;
        let expires_at = claims
            .expires_at()
            .ok_or(AppError::Auth(AuthRejection::Malformed))?;

        // Runs detached so a dropped request cannot leave the ledger written
        // but the stored token uncleared.
        let ledger = Arc::clone(&self.ledger);
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            ledger.revoke(&token, expires_at).await?;
            store.set_token(&claims.usuario, None).await?;
            info!(usuario = %claims.usuario, "token revoked on logout");
            Ok::<_, StoreError>(())
        })
        .await
        .map_err(|e| {
            warn!("logout task failed: {}", e);
            AppError::Internal(e.to_string())
        })??;

        Ok(())
    }
}

async fn check_password(candidate: &str, stored_hash: String) -> Result<bool, AppError> {
    let candidate = candidate.to_owned();
    tokio::task::spawn_blocking(move || verify_password(&candidate, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("password check aborted: {e}")))?
        .map_err(|e| AppError::Internal(format!("unreadable password hash: {e}")))
}
