//! Product Repository

use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::db::models::{FilterValue, Product, ProductCreate, ProductUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find products, optionally filtered by category and active flag,
    /// newest first
    pub async fn find_all(
        &self,
        category: Option<&str>,
        is_active: Option<bool>,
    ) -> RepoResult<Vec<Product>> {
        let mut conditions: Vec<&str> = Vec::new();
        if category.is_some() {
            conditions.push("category = $category");
        }
        if is_active.is_some() {
            conditions.push("is_active = $active");
        }

        let mut sql = String::from("SELECT * FROM product");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(category) = category {
            query = query.bind(("category", make_record_id("category", category)));
        }
        if let Some(active) = is_active {
            query = query.bind(("active", active));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let key = strip_table_prefix(TABLE, id).to_string();
        let product: Option<Product> = self.base.db().select((TABLE, key)).await?;
        Ok(product)
    }

    /// Count products of a category
    pub async fn count_by_category(&self, category_id: &str) -> RepoResult<i64> {
        let category = make_record_id("category", category_id);
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE category = $category GROUP ALL")
            .bind(("category", category))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Resolve the full filter value records attached to a product
    pub async fn find_filter_values(&self, id: &str) -> RepoResult<Vec<FilterValue>> {
        let product = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;
        if product.filter_values.is_empty() {
            return Ok(vec![]);
        }
        let values: Vec<FilterValue> = self
            .base
            .db()
            .query("SELECT * FROM filter_value WHERE id IN $ids ORDER BY value ASC")
            .bind(("ids", product.filter_values))
            .await?
            .take(0)?;
        Ok(values)
    }

    /// Create a product; the category must exist
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let category = make_record_id("category", &data.category);
        let existing: Option<crate::db::models::Category> = self
            .base
            .db()
            .select(("category", category.key().to_string()))
            .await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!(
                "Category {} not found",
                data.category
            )));
        }

        let filter_values: Vec<RecordId> = data
            .filter_values
            .iter()
            .map(|id| make_record_id("filter_value", id))
            .collect();

        let now = now_millis();

        // Plain RecordId fields so the store keeps them as record links
        #[derive(Serialize)]
        struct InternalProduct {
            name: String,
            category: RecordId,
            description: String,
            price: rust_decimal::Decimal,
            old_price: Option<rust_decimal::Decimal>,
            quantity: i64,
            is_active: bool,
            filter_values: Vec<RecordId>,
            created_at: i64,
            updated_at: i64,
        }

        let product = InternalProduct {
            name: data.name,
            category,
            description: data.description.unwrap_or_default(),
            price: data.price,
            old_price: data.old_price,
            quantity: data.quantity.unwrap_or(0),
            is_active: true,
            filter_values,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product; a new category must exist
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = make_record_id(TABLE, id);

        let category = match &data.category {
            Some(category_id) => {
                let category = make_record_id("category", category_id);
                let existing: Option<crate::db::models::Category> = self
                    .base
                    .db()
                    .select(("category", category.key().to_string()))
                    .await?;
                if existing.is_none() {
                    return Err(RepoError::NotFound(format!(
                        "Category {} not found",
                        category_id
                    )));
                }
                Some(category)
            }
            None => None,
        };

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if category.is_some() {
            set_parts.push("category = $category");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.old_price.is_some() {
            set_parts.push("old_price = $old_price");
        }
        if data.quantity.is_some() {
            set_parts.push("quantity = $quantity");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }
        if data.filter_values.is_some() {
            set_parts.push("filter_values = $filter_values");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("thing", thing))
            .bind(("now", now_millis()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.old_price {
            query = query.bind(("old_price", v));
        }
        if let Some(v) = data.quantity {
            query = query.bind(("quantity", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }
        if let Some(v) = data.filter_values {
            let ids: Vec<RecordId> = v
                .iter()
                .map(|id| make_record_id("filter_value", id))
                .collect();
            query = query.bind(("filter_values", ids));
        }

        let mut result = query.await?;
        let updated: Option<Product> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Flip the active flag and return the updated product
    pub async fn toggle_active(&self, id: &str) -> RepoResult<Product> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let thing = make_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET is_active = $active, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("active", !existing.is_active))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Product> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Attach a filter value to a product (idempotent: set semantics)
    pub async fn add_filter_value(&self, id: &str, filter_value_id: &str) -> RepoResult<Product> {
        let thing = make_record_id(TABLE, id);
        let fv = make_record_id("filter_value", filter_value_id);

        let existing: Option<FilterValue> = self
            .base
            .db()
            .select(("filter_value", fv.key().to_string()))
            .await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!(
                "Filter value {} not found",
                filter_value_id
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET filter_values = array::union(filter_values, [$fv]), updated_at = $now RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("fv", fv))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Product> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Detach a filter value from a product
    pub async fn remove_filter_value(
        &self,
        id: &str,
        filter_value_id: &str,
    ) -> RepoResult<Product> {
        let thing = make_record_id(TABLE, id);
        let fv = make_record_id("filter_value", filter_value_id);

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET filter_values -= $fv, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("fv", fv))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Product> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Delete a product and its photos and tabs in one transaction
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let thing = existing
            .id
            .clone()
            .unwrap_or_else(|| make_record_id(TABLE, id));

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 DELETE product_photo WHERE product = $product; \
                 DELETE product_tab WHERE product = $product; \
                 DELETE $product; \
                 COMMIT TRANSACTION;",
            )
            .bind(("product", thing))
            .await?
            .check()?;

        Ok(())
    }
}
