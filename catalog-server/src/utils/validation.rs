//! Input validation helpers
//!
//! Centralized field checks for the catalog entities. Each entity has a
//! single validation function callable before the persistence path, so the
//! checks can be unit-tested without a live store.

use rust_decimal::Decimal;

use crate::db::models::{
    CategoryCreate, CategoryUpdate, FilterCreate, FilterValueCreate, ProductCreate,
    ProductPhotoCreate, ProductTabCreate, ProductUpdate,
};
use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Entity names: category, product, filter, tab title, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Filter value strings
pub const MAX_VALUE_LEN: usize = 200;

/// Product descriptions and tab content
pub const MAX_TEXT_LEN: usize = 10_000;

/// Image payload cap (reference string, base64 or path): 5 MiB
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

fn validate_non_negative(value: Decimal, field: &str) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::validation(format!("{field} must not be negative")));
    }
    Ok(())
}

// ── Per-entity validation ───────────────────────────────────────────

pub fn validate_category_create(data: &CategoryCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)
}

/// A category may not be its own parent. Deeper cycles (A→B→A) are not
/// checked; this guard matches the single-hop rule the data model promises.
pub fn validate_category_update(id: &str, data: &CategoryUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(parent) = &data.parent {
        let parent_key = parent.strip_prefix("category:").unwrap_or(parent);
        let own_key = id.strip_prefix("category:").unwrap_or(id);
        if parent_key == own_key {
            return Err(AppError::validation(
                "Category cannot be its own parent".to_string(),
            ));
        }
    }
    Ok(())
}

pub fn validate_product_create(data: &ProductCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_TEXT_LEN)?;
    validate_non_negative(data.price, "price")?;
    if let Some(old_price) = data.old_price {
        validate_non_negative(old_price, "old_price")?;
    }
    if let Some(quantity) = data.quantity
        && quantity < 0
    {
        return Err(AppError::validation("quantity must not be negative".to_string()));
    }
    Ok(())
}

pub fn validate_product_update(data: &ProductUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_TEXT_LEN)?;
    if let Some(price) = data.price {
        validate_non_negative(price, "price")?;
    }
    if let Some(old_price) = data.old_price {
        validate_non_negative(old_price, "old_price")?;
    }
    if let Some(quantity) = data.quantity
        && quantity < 0
    {
        return Err(AppError::validation("quantity must not be negative".to_string()));
    }
    Ok(())
}

pub fn validate_photo_create(data: &ProductPhotoCreate) -> Result<(), AppError> {
    validate_required_text(&data.image, "image", MAX_IMAGE_BYTES)?;
    validate_image_size(&data.image)
}

/// The image reference carries the payload (base64 or path); cap it at 5 MiB.
pub fn validate_image_size(image: &str) -> Result<(), AppError> {
    if image.len() > MAX_IMAGE_BYTES {
        return Err(AppError::validation(
            "Image payload must not exceed 5 MiB".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_tab_create(data: &ProductTabCreate) -> Result<(), AppError> {
    validate_required_text(&data.title, "title", MAX_NAME_LEN)?;
    validate_required_text(&data.content, "content", MAX_TEXT_LEN)
}

pub fn validate_filter_create(data: &FilterCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)
}

pub fn validate_filter_value_create(data: &FilterValueCreate) -> Result<(), AppError> {
    validate_required_text(&data.value, "value", MAX_VALUE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn rejects_empty_name() {
        let data = CategoryCreate {
            name: "   ".to_string(),
            parent: None,
        };
        assert!(validate_category_create(&data).is_err());
    }

    #[test]
    fn rejects_self_parent() {
        let data = CategoryUpdate {
            name: None,
            parent: Some("category:abc".to_string()),
            is_active: None,
        };
        let err = validate_category_update("abc", &data).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Full "table:key" form on both sides
        let err = validate_category_update("category:abc", &data).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn accepts_distinct_parent() {
        let data = CategoryUpdate {
            name: None,
            parent: Some("category:other".to_string()),
            is_active: None,
        };
        assert!(validate_category_update("abc", &data).is_ok());
    }

    #[test]
    fn rejects_negative_price() {
        let data = ProductCreate {
            name: "Chair".to_string(),
            category: "category:abc".to_string(),
            description: None,
            price: Decimal::new(-100, 2),
            old_price: None,
            quantity: None,
            filter_values: Vec::new(),
        };
        assert!(validate_product_create(&data).is_err());
    }

    #[test]
    fn rejects_oversized_image() {
        let data = ProductPhotoCreate {
            product: "product:abc".to_string(),
            image: "x".repeat(MAX_IMAGE_BYTES + 1),
            is_main: None,
        };
        assert!(validate_photo_create(&data).is_err());
    }

    #[test]
    fn accepts_valid_product() {
        let data = ProductCreate {
            name: "Chair".to_string(),
            category: "category:abc".to_string(),
            description: Some("A chair".to_string()),
            price: Decimal::new(19999, 2),
            old_price: Some(Decimal::new(24999, 2)),
            quantity: Some(3),
            filter_values: Vec::new(),
        };
        assert!(validate_product_create(&data).is_ok());
    }
}
