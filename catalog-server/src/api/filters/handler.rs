//! Filter API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Filter, FilterCreate, FilterUpdate, FilterValue};
use crate::db::repository::{FilterRepository, FilterValueRepository};
use crate::utils::validation::validate_filter_create;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct FilterListQuery {
    /// Filter by category id
    pub category: Option<String>,
}

/// GET /api/filters
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FilterListQuery>,
) -> AppResult<Json<Vec<Filter>>> {
    let repo = FilterRepository::new(state.get_db());
    let filters = repo.find_all(query.category.as_deref()).await?;
    Ok(Json(filters))
}

/// GET /api/filters/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Filter>> {
    let repo = FilterRepository::new(state.get_db());
    let filter = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Filter {} not found", id)))?;
    Ok(Json(filter))
}

/// GET /api/filters/:id/values
pub async fn list_values(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FilterValue>>> {
    let repo = FilterRepository::new(state.get_db());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Filter {} not found", id)))?;
    let values = FilterValueRepository::new(state.get_db())
        .find_all(Some(&id))
        .await?;
    Ok(Json(values))
}

/// POST /api/filters
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FilterCreate>,
) -> AppResult<Json<Filter>> {
    validate_filter_create(&payload)?;
    let repo = FilterRepository::new(state.get_db());
    let filter = repo.create(payload).await?;
    Ok(Json(filter))
}

/// PUT /api/filters/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<FilterUpdate>,
) -> AppResult<Json<Filter>> {
    let repo = FilterRepository::new(state.get_db());
    let filter = repo.update(&id, payload).await?;
    Ok(Json(filter))
}

/// DELETE /api/filters/:id - cascades to values
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = FilterRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(true))
}
