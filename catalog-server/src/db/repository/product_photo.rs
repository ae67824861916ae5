//! Product Photo Repository
//!
//! Owns the two photo-specific invariants: append ordering (shared with
//! tabs, see [`super::ordering`]) and the single main photo per product.

use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, make_record_id, ordering};
use crate::db::models::{Product, ProductPhoto, ProductPhotoCreate, ProductPhotoUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "product_photo";

#[derive(Clone)]
pub struct ProductPhotoRepository {
    base: BaseRepository,
}

impl ProductPhotoRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all photos sorted by (sort_order, created_at)
    pub async fn find_all(&self) -> RepoResult<Vec<ProductPhoto>> {
        let photos: Vec<ProductPhoto> = self
            .base
            .db()
            .query("SELECT * FROM product_photo ORDER BY sort_order ASC, created_at ASC")
            .await?
            .take(0)?;
        Ok(photos)
    }

    /// Find photos of a product sorted by (sort_order, created_at)
    pub async fn find_by_product(&self, product_id: &str) -> RepoResult<Vec<ProductPhoto>> {
        let product = make_record_id("product", product_id);
        let photos: Vec<ProductPhoto> = self
            .base
            .db()
            .query("SELECT * FROM product_photo WHERE product = $product ORDER BY sort_order ASC, created_at ASC")
            .bind(("product", product))
            .await?
            .take(0)?;
        Ok(photos)
    }

    /// Find photo by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ProductPhoto>> {
        let key = super::strip_table_prefix(TABLE, id).to_string();
        let photo: Option<ProductPhoto> = self.base.db().select((TABLE, key)).await?;
        Ok(photo)
    }

    /// Main photo of a product, if any
    pub async fn find_main(&self, product_id: &str) -> RepoResult<Option<ProductPhoto>> {
        let product = make_record_id("product", product_id);
        let photos: Vec<ProductPhoto> = self
            .base
            .db()
            .query("SELECT * FROM product_photo WHERE product = $product AND is_main = true")
            .bind(("product", product))
            .await?
            .take(0)?;
        Ok(photos.into_iter().next())
    }

    /// Main photos for a set of products (list projections)
    pub async fn find_main_for_products(
        &self,
        product_ids: &[RecordId],
    ) -> RepoResult<Vec<ProductPhoto>> {
        if product_ids.is_empty() {
            return Ok(vec![]);
        }
        let photos: Vec<ProductPhoto> = self
            .base
            .db()
            .query("SELECT * FROM product_photo WHERE is_main = true AND product IN $products")
            .bind(("products", product_ids.to_vec()))
            .await?
            .take(0)?;
        Ok(photos)
    }

    /// Create a photo appended to its product's gallery.
    ///
    /// The first photo of a product becomes main; any caller-supplied
    /// is_main is ignored. sort_order = sibling max + 1; see
    /// [`ordering::next_sort_order`] for the concurrency caveat.
    pub async fn create(&self, data: ProductPhotoCreate) -> RepoResult<ProductPhoto> {
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

        let siblings: Vec<i32> = self
            .base
            .db()
            .query("SELECT VALUE sort_order FROM product_photo WHERE product = $product")
            .bind(("product", product.clone()))
            .await?
            .take(0)?;
        let is_first = siblings.is_empty();
        let sort_order = siblings.into_iter().max().unwrap_or(0) + 1;

        // Plain RecordId fields so the store keeps them as record links
        #[derive(Serialize)]
        struct InternalPhoto {
            product: RecordId,
            image: String,
            is_main: bool,
            sort_order: i32,
            created_at: i64,
        }

        let photo = InternalPhoto {
            product,
            image: data.image,
            is_main: is_first,
            sort_order,
            created_at: now_millis(),
        };

        let created: Option<ProductPhoto> = self.base.db().create(TABLE).content(photo).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create photo".to_string()))
    }

    /// Update image/sort_order of a photo (is_main only changes via set_main)
    pub async fn update(&self, id: &str, data: ProductPhotoUpdate) -> RepoResult<ProductPhoto> {
        let thing = make_record_id(TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.image.is_some() {
            set_parts.push("image = $image");
        }
        if data.sort_order.is_some() {
            set_parts.push("sort_order = $sort_order");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Photo {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }
        if let Some(v) = data.sort_order {
            query = query.bind(("sort_order", v));
        }

        let mut result = query.await?;
        let updated: Option<ProductPhoto> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Photo {} not found", id)))
    }

    /// Make the photo its product's main photo.
    ///
    /// Clear-then-set runs as one transaction: afterwards exactly one photo
    /// of the product is main, whatever the prior state. Idempotent.
    pub async fn set_main(&self, id: &str) -> RepoResult<ProductPhoto> {
        let photo = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Photo {} not found", id)))?;

        let thing = make_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE product_photo SET is_main = false WHERE product = $product AND id != $photo; \
                 UPDATE $photo SET is_main = true RETURN AFTER; \
                 COMMIT TRANSACTION;",
            )
            .bind(("product", photo.product.clone()))
            .bind(("photo", thing))
            .await?;

        let updated: Option<ProductPhoto> = result.take(1)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Photo {} not found", id)))
    }

    /// Bulk sort_order reassignment; one transaction, unknown ids skipped
    pub async fn reorder(&self, updates: &[ordering::SortOrderUpdate]) -> RepoResult<()> {
        ordering::apply_sort_orders(self.base.db(), TABLE, updates).await
    }

    /// Delete a photo
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let key = super::strip_table_prefix(TABLE, id).to_string();
        let deleted: Option<ProductPhoto> = self.base.db().delete((TABLE, key)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Photo {} not found", id)));
        }
        Ok(())
    }
}
