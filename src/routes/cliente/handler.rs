use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};

use super::model::ClienteRequest;
use crate::{
    AppState,
    auth::Identity,
    database::models::Cliente,
    error::AppError,
    routes::{MessageResponse, parse_id},
};

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Cliente>>, AppError> {
    let clientes = state.clientes.get_all().await?;
    tracing::debug!(usuario = %identity.usuario, count = clientes.len(), "clientes listed");
    Ok(Json(clientes))
}

#[axum::debug_handler]
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cliente>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.clientes.get_by_id(id).await?))
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ClienteRequest>,
) -> Result<(StatusCode, Json<Cliente>), AppError> {
    let cliente = req.validate()?;
    let created = state.clientes.create(cliente).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ClienteRequest>,
) -> Result<Json<Cliente>, AppError> {
    let id = parse_id(&id)?;
    let cliente = req.validate()?;
    Ok(Json(state.clientes.update(id, cliente).await?))
}

#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    state.clientes.delete(id).await?;
    Ok(Json(MessageResponse::new("cliente removed")))
}
