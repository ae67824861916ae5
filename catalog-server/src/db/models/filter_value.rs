//! Filter Value Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type FilterValueId = RecordId;

/// Filter value - unique per (filter, value), referenced by many products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterValue {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FilterValueId>,
    #[serde(with = "serde_helpers::record_id")]
    pub filter: RecordId,
    pub value: String,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterValueCreate {
    /// Filter id ("filter:xxx" or bare key)
    pub filter: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterValueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}
