//! Category Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type CategoryId = RecordId;

/// Category model - self-referential tree via `parent`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CategoryId>,
    pub name: String,
    /// Parent category; None for top-level categories
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub parent: Option<CategoryId>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    /// Parent category id ("category:xxx" or bare key)
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
