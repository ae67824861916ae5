//! Product Photo API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{ProductPhoto, ProductPhotoCreate, ProductPhotoUpdate};
use crate::db::repository::{ProductPhotoRepository, SortOrderUpdate};
use crate::utils::validation::{validate_image_size, validate_photo_create};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct PhotoListQuery {
    /// Filter by product id
    pub product: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchUpdateResponse {
    pub updated: usize,
}

/// GET /api/product-photos - sorted by (sort_order, created_at)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PhotoListQuery>,
) -> AppResult<Json<Vec<ProductPhoto>>> {
    let repo = ProductPhotoRepository::new(state.get_db());
    let photos = match query.product.as_deref() {
        Some(product) => repo.find_by_product(product).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(photos))
}

/// GET /api/product-photos/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductPhoto>> {
    let repo = ProductPhotoRepository::new(state.get_db());
    let photo = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Photo {} not found", id)))?;
    Ok(Json(photo))
}

/// POST /api/product-photos
///
/// Appends to the product's gallery: sort_order = max + 1, and the first
/// photo of a product automatically becomes main.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductPhotoCreate>,
) -> AppResult<Json<ProductPhoto>> {
    validate_photo_create(&payload)?;
    let repo = ProductPhotoRepository::new(state.get_db());
    let photo = repo.create(payload).await?;
    Ok(Json(photo))
}

/// PUT /api/product-photos/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPhotoUpdate>,
) -> AppResult<Json<ProductPhoto>> {
    if let Some(image) = &payload.image {
        validate_image_size(image)?;
    }
    let repo = ProductPhotoRepository::new(state.get_db());
    let photo = repo.update(&id, payload).await?;
    Ok(Json(photo))
}

/// POST /api/product-photos/:id/set-main
///
/// Atomically hands the main flag to this photo; every other photo of the
/// same product is cleared in the same transaction.
pub async fn set_main(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductPhoto>> {
    let repo = ProductPhotoRepository::new(state.get_db());
    let photo = repo.set_main(&id).await?;
    Ok(Json(photo))
}

/// PUT /api/product-photos/sort-order
///
/// Applies the batch as one transaction; entries with unknown ids are
/// skipped rather than failing the batch.
pub async fn batch_update_sort_order(
    State(state): State<ServerState>,
    Json(updates): Json<Vec<SortOrderUpdate>>,
) -> AppResult<Json<BatchUpdateResponse>> {
    tracing::info!(count = updates.len(), "Batch update photo sort order");

    let repo = ProductPhotoRepository::new(state.get_db());
    repo.reorder(&updates).await?;

    Ok(Json(BatchUpdateResponse {
        updated: updates.len(),
    }))
}

/// DELETE /api/product-photos/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductPhotoRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(true))
}
