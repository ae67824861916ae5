//! Product API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{
    Category, FilterValue, Product, ProductCreate, ProductPhoto, ProductTab, ProductUpdate,
};
use crate::db::repository::{
    CategoryRepository, ProductPhotoRepository, ProductRepository, ProductTabRepository,
};
use crate::utils::validation::{validate_product_create, validate_product_update};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Filter by category id
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

/// Product list item with resolved category name and main photo
#[derive(Debug, Serialize)]
pub struct ProductListItem {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
    /// Image reference of the main photo, if one is selected
    pub main_photo: Option<String>,
}

/// Product with its sorted galleries and filter values embedded
#[derive(Debug, Serialize)]
pub struct ProductFull {
    #[serde(flatten)]
    pub product: Product,
    pub photos: Vec<ProductPhoto>,
    pub tabs: Vec<ProductTab>,
    pub filter_values: Vec<FilterValue>,
}

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<ProductListItem>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo
        .find_all(query.category.as_deref(), query.is_active)
        .await?;

    // Resolve category names and main photos in two batch lookups
    let categories: Vec<Category> = CategoryRepository::new(state.get_db())
        .find_all(None, None)
        .await?;
    let category_names: HashMap<String, String> = categories
        .into_iter()
        .filter_map(|c| c.id.as_ref().map(|id| (id.to_string(), c.name.clone())))
        .collect();

    let product_ids: Vec<_> = products.iter().filter_map(|p| p.id.clone()).collect();
    let main_photos: HashMap<String, String> = ProductPhotoRepository::new(state.get_db())
        .find_main_for_products(&product_ids)
        .await?
        .into_iter()
        .map(|photo| (photo.product.to_string(), photo.image))
        .collect();

    let items = products
        .into_iter()
        .map(|product| {
            let category_name = category_names.get(&product.category.to_string()).cloned();
            let main_photo = product
                .id
                .as_ref()
                .and_then(|id| main_photos.get(&id.to_string()).cloned());
            ProductListItem {
                product,
                category_name,
                main_photo,
            }
        })
        .collect();

    Ok(Json(items))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// GET /api/products/:id/full - photos and tabs pre-sorted
pub async fn get_full(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductFull>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;

    let photos = ProductPhotoRepository::new(state.get_db())
        .find_by_product(&id)
        .await?;
    let tabs = ProductTabRepository::new(state.get_db())
        .find_by_product(&id)
        .await?;
    let filter_values = repo.find_filter_values(&id).await?;

    Ok(Json(ProductFull {
        product,
        photos,
        tabs,
        filter_values,
    }))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_product_create(&payload)?;
    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;
    Ok(Json(product))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    validate_product_update(&payload)?;
    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

/// POST /api/products/:id/toggle-active
pub async fn toggle_active(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.toggle_active(&id).await?;
    Ok(Json(product))
}

/// GET /api/products/:id/filter-values
pub async fn list_filter_values(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FilterValue>>> {
    let repo = ProductRepository::new(state.get_db());
    Ok(Json(repo.find_filter_values(&id).await?))
}

/// POST /api/products/:id/filter-values/:fv_id
pub async fn add_filter_value(
    State(state): State<ServerState>,
    Path((id, fv_id)): Path<(String, String)>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.add_filter_value(&id, &fv_id).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id/filter-values/:fv_id
pub async fn remove_filter_value(
    State(state): State<ServerState>,
    Path((id, fv_id)): Path<(String, String)>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.remove_filter_value(&id, &fv_id).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id - cascades to photos and tabs
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(true))
}
