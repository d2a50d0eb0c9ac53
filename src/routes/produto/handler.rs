use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use super::model::ProdutoRequest;
use crate::{
    AppState,
    database::models::Produto,
    error::AppError,
    routes::{MessageResponse, parse_id},
};

fn not_found() -> AppError {
    AppError::NotFound("produto not found".into())
}

#[axum::debug_handler]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Produto>>, AppError> {
    Ok(Json(state.produtos.list().await?))
}

#[axum::debug_handler]
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Produto>, AppError> {
    let id = parse_id(&id)?;
    let produto = state.produtos.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(produto))
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ProdutoRequest>,
) -> Result<(StatusCode, Json<Produto>), AppError> {
    let produto = req.validate()?;
    let created = state.produtos.create(&produto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProdutoRequest>,
) -> Result<Json<Produto>, AppError> {
    let id = parse_id(&id)?;
    let produto = req.validate()?;
    let updated = state
        .produtos
        .update(id, &produto)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    if !state.produtos.delete(id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new("produto removed")))
}
