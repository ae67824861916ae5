//! Product Tab Repository
//!
//! Same ordering discipline as photos, no main-selection invariant.

use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, make_record_id, ordering};
use crate::db::models::{Product, ProductTab, ProductTabCreate, ProductTabUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "product_tab";

#[derive(Clone)]
pub struct ProductTabRepository {
    base: BaseRepository,
}

impl ProductTabRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all tabs sorted by (sort_order, created_at)
    pub async fn find_all(&self) -> RepoResult<Vec<ProductTab>> {
        let tabs: Vec<ProductTab> = self
            .base
            .db()
            .query("SELECT * FROM product_tab ORDER BY sort_order ASC, created_at ASC")
            .await?
            .take(0)?;
        Ok(tabs)
    }

    /// Find tabs of a product sorted by (sort_order, created_at)
    pub async fn find_by_product(&self, product_id: &str) -> RepoResult<Vec<ProductTab>> {
        let product = make_record_id("product", product_id);
        let tabs: Vec<ProductTab> = self
            .base
            .db()
            .query("SELECT * FROM product_tab WHERE product = $product ORDER BY sort_order ASC, created_at ASC")
            .bind(("product", product))
            .await?
            .take(0)?;
        Ok(tabs)
    }

    /// Find tab by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ProductTab>> {
        let key = super::strip_table_prefix(TABLE, id).to_string();
        let tab: Option<ProductTab> = self.base.db().select((TABLE, key)).await?;
        Ok(tab)
    }

    /// Create a tab appended to its product's tab list (sort_order = max + 1)
    pub async fn create(&self, data: ProductTabCreate) -> RepoResult<ProductTab> {
        let product = make_record_id("product", &data.product);

        let existing: Option<Product> = self
            .base
            .db()
            .select(("product", product.key().to_string()))
            .await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!(
                "Product {} not found",
                data.product
            )));
        }

        let sort_order = ordering::next_sort_order(self.base.db(), TABLE, &product).await?;

        let now = now_millis();

        #[derive(Serialize)]
        struct InternalTab {
            product: RecordId,
            title: String,
            content: String,
            sort_order: i32,
            created_at: i64,
            updated_at: i64,
        }

        let tab = InternalTab {
            product,
            title: data.title,
            content: data.content,
            sort_order,
            created_at: now,
            updated_at: now,
        };

        let created: Option<ProductTab> = self.base.db().create(TABLE).content(tab).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create tab".to_string()))
    }

    /// Update a tab
    pub async fn update(&self, id: &str, data: ProductTabUpdate) -> RepoResult<ProductTab> {
        let thing = make_record_id(TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.title.is_some() {
            set_parts.push("title = $title");
        }
        if data.content.is_some() {
            set_parts.push("content = $content");
        }
        if data.sort_order.is_some() {
            set_parts.push("sort_order = $sort_order");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Tab {} not found", id)));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("thing", thing))
            .bind(("now", now_millis()));
        if let Some(v) = data.title {
            query = query.bind(("title", v));
        }
        if let Some(v) = data.content {
            query = query.bind(("content", v));
        }
        if let Some(v) = data.sort_order {
            query = query.bind(("sort_order", v));
        }

        let mut result = query.await?;
        let updated: Option<ProductTab> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Tab {} not found", id)))
    }

    /// Bulk sort_order reassignment; one transaction, unknown ids skipped
    pub async fn reorder(&self, updates: &[ordering::SortOrderUpdate]) -> RepoResult<()> {
        ordering::apply_sort_orders(self.base.db(), TABLE, updates).await
    }

    /// Delete a tab
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let key = super::strip_table_prefix(TABLE, id).to_string();
        let deleted: Option<ProductTab> = self.base.db().delete((TABLE, key)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Tab {} not found", id)));
        }
        Ok(())
    }
}
