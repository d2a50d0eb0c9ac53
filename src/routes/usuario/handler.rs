use axum::{
    extract::{Json, State},
    http::StatusCode,
};

use super::model::CreateUsuarioRequest;
use crate::{AppState, database::models::UserSummary, error::AppError};

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateUsuarioRequest>,
) -> Result<(StatusCode, Json<UserSummary>), AppError> {
    let (usuario, senha) = req.validate()?;
    let user = state.usuarios.signup(&usuario, &senha).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, AppError> {
    Ok(Json(state.usuarios.list().await?))
}
