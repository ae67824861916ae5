//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::utils::validation::{validate_category_create, validate_category_update};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    /// Filter by parent category id
    pub parent: Option<String>,
    pub is_active: Option<bool>,
}

/// Category detail with one level of active children and a product count
#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<Category>,
    pub products_count: i64,
}

/// GET /api/categories
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CategoryListQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo
        .find_all(query.parent.as_deref(), query.is_active)
        .await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryDetail>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;

    let children = repo.find_children(&id).await?;
    let products_count = ProductRepository::new(state.get_db())
        .count_by_category(&id)
        .await?;

    Ok(Json(CategoryDetail {
        category,
        children,
        products_count,
    }))
}

/// GET /api/categories/:id/children - immediate active children only
pub async fn children(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    Ok(Json(repo.find_children(&id).await?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_category_create(&payload)?;
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;
    Ok(Json(category))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    validate_category_update(&id, &payload)?;
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;
    Ok(Json(category))
}

/// POST /api/categories/:id/toggle-active
pub async fn toggle_active(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.toggle_active(&id).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - cascades to children, filters and products
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CategoryRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(true))
}
