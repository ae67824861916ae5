//! Product Photo Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductPhotoId = RecordId;

/// Product photo - ordered within its product, at most one is main
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPhoto {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductPhotoId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// Opaque image reference (path or inline payload)
    pub image: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_main: bool,
    /// Sparse sort key; ties broken by created_at
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPhotoCreate {
    /// Product id ("product:xxx" or bare key)
    pub product: String,
    pub image: String,
    /// Ignored on create: the first photo of a product always becomes main,
    /// later photos start as not-main and are promoted via set-main.
    pub is_main: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPhotoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}
