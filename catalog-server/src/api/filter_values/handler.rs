//! Filter Value API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{FilterValue, FilterValueCreate, FilterValueUpdate};
use crate::db::repository::FilterValueRepository;
use crate::utils::validation::validate_filter_value_create;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct FilterValueListQuery {
    /// Filter by owning filter id
    pub filter: Option<String>,
}

/// GET /api/filter-values
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FilterValueListQuery>,
) -> AppResult<Json<Vec<FilterValue>>> {
    let repo = FilterValueRepository::new(state.get_db());
    let values = repo.find_all(query.filter.as_deref()).await?;
    Ok(Json(values))
}

/// GET /api/filter-values/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<FilterValue>> {
    let repo = FilterValueRepository::new(state.get_db());
    let value = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Filter value {} not found", id)))?;
    Ok(Json(value))
}

/// POST /api/filter-values
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FilterValueCreate>,
) -> AppResult<Json<FilterValue>> {
    validate_filter_value_create(&payload)?;
    let repo = FilterValueRepository::new(state.get_db());
    let value = repo.create(payload).await?;
    Ok(Json(value))
}

/// PUT /api/filter-values/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<FilterValueUpdate>,
) -> AppResult<Json<FilterValue>> {
    let repo = FilterValueRepository::new(state.get_db());
    let value = repo.update(&id, payload).await?;
    Ok(Json(value))
}

/// DELETE /api/filter-values/:id - detaches from products
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = FilterValueRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(true))
}
