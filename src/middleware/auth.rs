use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{
    AppState,
    auth::{AuthDecision, AuthRejection},
    error::AppError,
};

/// Extracts the token from `Authorization: Bearer <token>`.
///
/// `Ok(None)` only when the header is absent. A present header that is not
/// a readable bearer credential is `Malformed`.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AuthRejection> {
    if !headers.contains_key(AUTHORIZATION) {
        return Ok(None);
    }
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| Some(bearer.token().to_owned()))
        .ok_or(AuthRejection::Malformed)
}

/// Runs the auth gate ahead of every protected route and attaches the
/// caller's `Identity` to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let decision = match bearer_token(request.headers()) {
        Ok(token) => state.gate.authenticate(token.as_deref()).await?,
        Err(reason) => AuthDecision::Rejected(reason),
    };

    match decision {
        AuthDecision::Authorized(identity) => {
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        AuthDecision::Rejected(reason) => {
            tracing::info!(
                path = %request.uri().path(),
                reason = ?reason,
                "request rejected by auth gate"
            );
            Err(AppError::Auth(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        headers
    }

    #[test]
    fn reads_bearer_tokens() {
        assert_eq!(
            bearer_token(&headers(HeaderValue::from_static("Bearer abc.def"))),
            Ok(Some("abc.def".into()))
        );
        assert_eq!(bearer_token(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn unreadable_credentials_are_malformed() {
        assert_eq!(
            bearer_token(&headers(HeaderValue::from_static("Basic dXNlcjpwdw=="))),
            Err(AuthRejection::Malformed)
        );
        let latin1 = HeaderValue::from_bytes(b"Bearer \xe9t\xe9").unwrap();
        assert_eq!(bearer_token(&headers(latin1)), Err(AuthRejection::Malformed));
    }
}
