use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AuthRejection;
use crate::config::Config;

/// The verified subject of a token, attached to protected requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub usuario: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub usuario: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            usuario: self.usuario.clone(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expiry is out of the representable range")]
    ExpiryOutOfRange,
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Signs and verifies HS256 tokens with the deployment secret.
///
/// Pure: no I/O, and verification never consults the revocation ledger.
/// Anyone holding the secret can mint tokens for any user.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: chrono::Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: chrono::Duration::from_std(lifetime)
                .unwrap_or_else(|_| chrono::Duration::hours(1)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiration())
    }

    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a token as if the clock read `now`.
    pub fn issue_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            id: identity.id,
            usuario: identity.usuario.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthRejection::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthRejection::SignatureInvalid
                }
                _ => AuthRejection::Malformed,
            })
    }

    /// Reads the claims without checking signature or expiry.
    pub fn decode_unverified(token: &str) -> Result<Claims, AuthRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthRejection::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity {
            id: 7,
            usuario: "alice".into(),
        }
    }

    fn authority() -> TokenAuthority {
        TokenAuthority::new("test-secret", Duration::from_secs(3600))
    }

    #[test]
    fn issued_token_verifies_and_carries_identity() {
        let authority = authority();
        let issued = authority.issue(&alice()).unwrap();

        let claims = authority.verify(&issued.token).unwrap();
        assert_eq!(claims.identity(), alice());
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn issuing_is_deterministic_for_the_same_clock() {
        let authority = authority();
        let now = Utc::now();
        let a = authority.issue_at(&alice(), now).unwrap();
        let b = authority.issue_at(&alice(), now).unwrap();
        assert_eq!(a.token, b.token);
    }

    #[test]
    fn lifetime_past_the_calendar_is_an_error_not_a_panic() {
        let authority = TokenAuthority::new("s", Duration::from_secs(100_000_000 * 86_400));
        assert!(matches!(
            authority.issue(&alice()),
            Err(TokenError::ExpiryOutOfRange)
        ));
    }

    #[test]
    fn past_expiry_is_rejected_as_expired() {
        let authority = authority();
        let issued = authority
            .issue_at(&alice(), Utc::now() - chrono::Duration::hours(2))
            .unwrap();

        assert_eq!(authority.verify(&issued.token), Err(AuthRejection::Expired));
    }

    #[test]
    fn foreign_secret_is_rejected_as_bad_signature() {
        let other = TokenAuthority::new("another-secret", Duration::from_secs(3600));
        let issued = other.issue(&alice()).unwrap();

        assert_eq!(
            authority().verify(&issued.token),
            Err(AuthRejection::SignatureInvalid)
        );
    }

    #[test]
    fn tampered_payload_is_rejected_as_bad_signature() {
        let authority = authority();
        let issued = authority.issue(&alice()).unwrap();
        let forged = TokenAuthority::new("x", Duration::from_secs(3600))
            .issue(&Identity {
                id: 1,
                usuario: "mallory".into(),
            })
            .unwrap();

        let original: Vec<&str> = issued.token.split('.').collect();
        let foreign: Vec<&str> = forged.token.split('.').collect();
        let spliced = format!("{}.{}.{}", original[0], foreign[1], original[2]);

        assert_eq!(
            authority.verify(&spliced),
            Err(AuthRejection::SignatureInvalid)
        );
    }

    #[test]
    fn garbage_is_rejected_as_malformed() {
        let authority = authority();
        assert_eq!(authority.verify("not-a-token"), Err(AuthRejection::Malformed));
        assert_eq!(authority.verify("a.b.c"), Err(AuthRejection::Malformed));
    }

    #[test]
    fn unverified_decode_ignores_signature_and_expiry() {
        let other = TokenAuthority::new("another-secret", Duration::from_secs(3600));
        let issued = other
            .issue_at(&alice(), Utc::now() - chrono::Duration::hours(5))
            .unwrap();

        let claims = TokenAuthority::decode_unverified(&issued.token).unwrap();
        assert_eq!(claims.usuario, "alice");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(
            TokenAuthority::decode_unverified("garbage"),
            Err(AuthRejection::Malformed)
        );
    }
}
