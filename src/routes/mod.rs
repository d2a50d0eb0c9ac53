use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    error::AppError,
    middleware::{auth_middleware, log_errors},
};

pub mod auth;
pub mod cliente;
pub mod index;
pub mod produto;
pub mod usuario;
mod validation;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parses an `{id}` path segment, which must be a positive integer.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::Validation(vec![
            "invalid id, must be a positive number".into(),
        ])),
    }
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(index::index))
        .route("/login", post(auth::login))
        .route("/auth/login", post(auth::login))
        .route("/usuarios", post(usuario::create))
        .route("/produtos", get(produto::list).post(produto::create))
        .route(
            "/produtos/{id}",
            get(produto::find_by_id)
                .put(produto::update)
                .delete(produto::delete),
        )
        .route("/produtos/{id}/update", post(produto::update))
        .route("/produtos/{id}/delete", post(produto::delete));

    let protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/auth/logout", post(auth::logout))
        .route("/usuarios", get(usuario::list))
        .route("/clientes", get(cliente::list).post(cliente::create))
        .route(
            "/clientes/{id}",
            get(cliente::find_by_id)
                .put(cliente::update)
                .delete(cliente::delete),
        )
        .route("/clientes/{id}/update", post(cliente::update))
        .route("/clientes/{id}/delete", post(cliente::delete))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(log_errors)),
        );

    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("12").unwrap(), 12);
        for bad in ["0", "-3", "abc", "", "1.5"] {
            assert!(matches!(parse_id(bad), Err(AppError::Validation(_))));
        }
    }
}
