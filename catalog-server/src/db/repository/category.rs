//! Category Repository

use std::collections::HashSet;

use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find categories, optionally filtered by parent and active flag
    pub async fn find_all(
        &self,
        parent: Option<&str>,
        is_active: Option<bool>,
    ) -> RepoResult<Vec<Category>> {
        let mut conditions: Vec<&str> = Vec::new();
        if parent.is_some() {
            conditions.push("parent = $parent");
        }
        if is_active.is_some() {
            conditions.push("is_active = $active");
        }

        let mut sql = String::from("SELECT * FROM category");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY name ASC");

        let mut query = self.base.db().query(sql);
        if let Some(parent) = parent {
            query = query.bind(("parent", make_record_id(TABLE, parent)));
        }
        if let Some(active) = is_active {
            query = query.bind(("active", active));
        }

        let categories: Vec<Category> = query.await?.take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let key = strip_table_prefix(TABLE, id).to_string();
        let category: Option<Category> = self.base.db().select((TABLE, key)).await?;
        Ok(category)
    }

    /// Immediate active children of a category (one level, not descendants)
    pub async fn find_children(&self, id: &str) -> RepoResult<Vec<Category>> {
        let parent = make_record_id(TABLE, id);
        let children: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE parent = $parent AND is_active = true ORDER BY name ASC")
            .bind(("parent", parent))
            .await?
            .take(0)?;
        Ok(children)
    }

    /// Create a category; the parent, when given, must exist
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let parent = match &data.parent {
            Some(parent_id) => {
                let parent = self.find_by_id(parent_id).await?.ok_or_else(|| {
                    RepoError::NotFound(format!("Parent category {} not found", parent_id))
                })?;
                parent.id
            }
            None => None,
        };

        let now = now_millis();

        // Plain RecordId fields so the store keeps them as record links
        #[derive(Serialize)]
        struct InternalCategory {
            name: String,
            parent: Option<RecordId>,
            is_active: bool,
            created_at: i64,
            updated_at: i64,
        }

        let category = InternalCategory {
            name: data.name,
            parent,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category. Self-parenting is rejected before any write;
    /// a new parent must exist.
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let parent = match &data.parent {
            Some(parent_id) => {
                if strip_table_prefix(TABLE, parent_id) == strip_table_prefix(TABLE, id) {
                    return Err(RepoError::Validation(
                        "Category cannot be its own parent".to_string(),
                    ));
                }
                let parent = self.find_by_id(parent_id).await?.ok_or_else(|| {
                    RepoError::NotFound(format!("Parent category {} not found", parent_id))
                })?;
                parent.id
            }
            None => None,
        };

        #[derive(Serialize)]
        struct CategoryUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            parent: Option<RecordId>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
            updated_at: i64,
        }

        let update_data = CategoryUpdateDb {
            name: data.name,
            parent,
            is_active: data.is_active,
            updated_at: now_millis(),
        };

        let thing = existing
            .id
            .clone()
            .unwrap_or_else(|| make_record_id(TABLE, id));
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", update_data))
            .await?;

        let updated: Option<Category> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Flip the active flag and return the updated category
    pub async fn toggle_active(&self, id: &str) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let thing = make_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET is_active = $active, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("active", !existing.is_active))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Category> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category and everything it owns: descendant categories,
    /// their filters and filter values (detached from any product that
    /// still references them), products, photos and tabs - one transaction.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let cats = self.collect_subtree(id).await?;

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $prods = (SELECT VALUE id FROM product WHERE category IN $cats); \
                 LET $flts = (SELECT VALUE id FROM filter WHERE category IN $cats); \
                 LET $fvs = (SELECT VALUE id FROM filter_value WHERE filter IN $flts); \
                 DELETE product_photo WHERE product IN $prods; \
                 DELETE product_tab WHERE product IN $prods; \
                 UPDATE product SET filter_values = array::complement(filter_values, $fvs) WHERE filter_values CONTAINSANY $fvs; \
                 DELETE filter_value WHERE filter IN $flts; \
                 DELETE filter WHERE category IN $cats; \
                 DELETE product WHERE category IN $cats; \
                 DELETE category WHERE id IN $cats; \
                 COMMIT TRANSACTION;",
            )
            .bind(("cats", cats))
            .await?
            .check()?;

        Ok(())
    }

    /// Collect the category and all its descendants by walking child links.
    /// The visited set guards the walk: deep cycles are representable (only
    /// direct self-parenting is rejected) and must not loop the traversal.
    async fn collect_subtree(&self, id: &str) -> RepoResult<Vec<RecordId>> {
        let root = make_record_id(TABLE, id);
        let mut seen: HashSet<String> = HashSet::from([root.to_string()]);
        let mut all = vec![root.clone()];
        let mut frontier = vec![root];

        while !frontier.is_empty() {
            let children: Vec<RecordId> = self
                .base
                .db()
                .query("SELECT VALUE id FROM category WHERE parent IN $parents")
                .bind(("parents", frontier))
                .await?
                .take(0)?;

            frontier = children
                .into_iter()
                .filter(|child| seen.insert(child.to_string()))
                .collect();
            all.extend(frontier.iter().cloned());
        }

        Ok(all)
    }
}
