//! Product Tab API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{ProductTab, ProductTabCreate, ProductTabUpdate};
use crate::db::repository::{ProductTabRepository, SortOrderUpdate};
use crate::utils::validation::validate_tab_create;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct TabListQuery {
    /// Filter by product id
    pub product: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchUpdateResponse {
    pub updated: usize,
}

/// GET /api/product-tabs - sorted by (sort_order, created_at)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TabListQuery>,
) -> AppResult<Json<Vec<ProductTab>>> {
    let repo = ProductTabRepository::new(state.get_db());
    let tabs = match query.product.as_deref() {
        Some(product) => repo.find_by_product(product).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(tabs))
}

/// GET /api/product-tabs/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductTab>> {
    let repo = ProductTabRepository::new(state.get_db());
    let tab = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Tab {} not found", id)))?;
    Ok(Json(tab))
}

/// POST /api/product-tabs - appends: sort_order = max + 1
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductTabCreate>,
) -> AppResult<Json<ProductTab>> {
    validate_tab_create(&payload)?;
    let repo = ProductTabRepository::new(state.get_db());
    let tab = repo.create(payload).await?;
    Ok(Json(tab))
}

/// PUT /api/product-tabs/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductTabUpdate>,
) -> AppResult<Json<ProductTab>> {
    let repo = ProductTabRepository::new(state.get_db());
    let tab = repo.update(&id, payload).await?;
    Ok(Json(tab))
}

/// PUT /api/product-tabs/sort-order
pub async fn batch_update_sort_order(
    State(state): State<ServerState>,
    Json(updates): Json<Vec<SortOrderUpdate>>,
) -> AppResult<Json<BatchUpdateResponse>> {
    tracing::info!(count = updates.len(), "Batch update tab sort order");

    let repo = ProductTabRepository::new(state.get_db());
    repo.reorder(&updates).await?;

    Ok(Json(BatchUpdateResponse {
        updated: updates.len(),
    }))
}

/// DELETE /api/product-tabs/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductTabRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(true))
}
