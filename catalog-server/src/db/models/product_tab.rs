//! Product Tab Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductTabId = RecordId;

/// Product content tab (description, specifications, ...), ordered within
/// its product like photos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTab {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductTabId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTabCreate {
    /// Product id ("product:xxx" or bare key)
    pub product: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTabUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}
