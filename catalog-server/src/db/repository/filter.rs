//! Filter Repository

use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::db::models::{Category, Filter, FilterCreate, FilterUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "filter";

#[derive(Clone)]
pub struct FilterRepository {
    base: BaseRepository,
}

impl FilterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find filters, optionally scoped to a category
    pub async fn find_all(&self, category: Option<&str>) -> RepoResult<Vec<Filter>> {
        let mut sql = String::from("SELECT * FROM filter");
        if category.is_some() {
            sql.push_str(" WHERE category = $category");
        }
        sql.push_str(" ORDER BY name ASC");

        let mut query = self.base.db().query(sql);
        if let Some(category) = category {
            query = query.bind(("category", make_record_id("category", category)));
        }

        let filters: Vec<Filter> = query.await?.take(0)?;
        Ok(filters)
    }

    /// Find filter by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Filter>> {
        let key = strip_table_prefix(TABLE, id).to_string();
        let filter: Option<Filter> = self.base.db().select((TABLE, key)).await?;
        Ok(filter)
    }

    /// Filters are unique per (name, category)
    async fn find_by_name(&self, category: &RecordId, name: &str) -> RepoResult<Option<Filter>> {
        let filters: Vec<Filter> = self
            .base
            .db()
            .query("SELECT * FROM filter WHERE category = $category AND name = $name")
            .bind(("category", category.clone()))
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;
        Ok(filters.into_iter().next())
    }

    /// Create a filter; the category must exist, (name, category) unique
    pub async fn create(&self, data: FilterCreate) -> RepoResult<Filter> {
        let category = make_record_id("category", &data.category);
        let existing: Option<Category> = self
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

        if self.find_by_name(&category, &data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Filter '{}' already exists in this category",
                data.name
            )));
        }

        #[derive(Serialize)]
        struct InternalFilter {
            name: String,
            category: RecordId,
            created_at: i64,
        }

        let filter = InternalFilter {
            name: data.name,
            category,
            created_at: now_millis(),
        };

        let created: Option<Filter> = self.base.db().create(TABLE).content(filter).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create filter".to_string()))
    }

    /// Update a filter, re-checking (name, category) uniqueness
    pub async fn update(&self, id: &str, data: FilterUpdate) -> RepoResult<Filter> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Filter {} not found", id)))?;

        let category = match &data.category {
            Some(category_id) => {
                let category = make_record_id("category", category_id);
                let found: Option<Category> = self
                    .base
                    .db()
                    .select(("category", category.key().to_string()))
                    .await?;
                if found.is_none() {
                    return Err(RepoError::NotFound(format!(
                        "Category {} not found",
                        category_id
                    )));
                }
                category
            }
            None => existing.category.clone(),
        };

        let name = data.name.clone().unwrap_or_else(|| existing.name.clone());
        if let Some(other) = self.find_by_name(&category, &name).await?
            && other.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Filter '{}' already exists in this category",
                name
            )));
        }

        #[derive(Serialize)]
        struct FilterUpdateDb {
            name: String,
            category: RecordId,
        }

        let thing = existing
            .id
            .clone()
            .unwrap_or_else(|| make_record_id(TABLE, id));
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", FilterUpdateDb { name, category }))
            .await?;

        let updated: Option<Filter> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Filter {} not found", id)))
    }

    /// Delete a filter, its values, and any product references to them -
    /// one transaction
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Filter {} not found", id)))?;

        let thing = existing
            .id
            .clone()
            .unwrap_or_else(|| make_record_id(TABLE, id));

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $fvs = (SELECT VALUE id FROM filter_value WHERE filter = $filter); \
                 UPDATE product SET filter_values = array::complement(filter_values, $fvs) WHERE filter_values CONTAINSANY $fvs; \
                 DELETE filter_value WHERE filter = $filter; \
                 DELETE $filter; \
                 COMMIT TRANSACTION;",
            )
            .bind(("filter", thing))
            .await?
            .check()?;

        Ok(())
    }
}
