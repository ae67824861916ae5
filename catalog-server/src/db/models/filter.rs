//! Filter Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type FilterId = RecordId;

/// Filter - category-scoped facet, unique per (name, category)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FilterId>,
    pub name: String,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCreate {
    pub name: String,
    /// Category id ("category:xxx" or bare key)
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
