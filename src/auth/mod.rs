//! Session-token lifecycle: issuing and verifying bearer tokens, the
//! revocation ledger, the per-request gate and the login/logout flows.

use serde::Serialize;
use thiserror::Error;

pub mod gate;
pub mod revocation;
pub mod session;
pub mod token;

pub use gate::{AuthDecision, AuthGate};
pub use revocation::RevocationLedger;
pub use session::{LoginOutcome, SessionService};
pub use token::{Claims, Identity, IssuedToken, TokenAuthority, TokenError};

/// Why a presented bearer token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum AuthRejection {
    #[error("token not provided")]
    MissingToken,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
    #[error("token has been revoked")]
    Revoked,
}
