use axum::{
    extract::{Json, State},
    http::HeaderMap,
};

use super::model::LoginRequest;
use crate::{
    AppState, auth::LoginOutcome, error::AppError, middleware::bearer_token,
    routes::MessageResponse,
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, AppError> {
    let outcome = state.sessions.login(&req.usuario, &req.senha).await?;
    Ok(Json(outcome))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = bearer_token(&headers).map_err(AppError::Auth)?;
    state.sessions.logout(token.as_deref()).await?;
    Ok(Json(MessageResponse::new("logged out")))
}
