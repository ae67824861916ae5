//! Product Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub old_price: Option<Decimal>,
    /// Stock count; quantity > 0 means in stock
    #[serde(default)]
    pub quantity: i64,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    /// Filter value references (many-to-many)
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub filter_values: Vec<RecordId>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    /// Category id ("category:xxx" or bare key)
    pub category: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub old_price: Option<Decimal>,
    pub quantity: Option<i64>,
    /// Filter value ids
    #[serde(default)]
    pub filter_values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_values: Option<Vec<String>>,
}
