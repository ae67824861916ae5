//! Filter Value Repository

use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::db::models::{Filter, FilterValue, FilterValueCreate, FilterValueUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "filter_value";

#[derive(Clone)]
pub struct FilterValueRepository {
    base: BaseRepository,
}

impl FilterValueRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find values, optionally scoped to a filter
    pub async fn find_all(&self, filter: Option<&str>) -> RepoResult<Vec<FilterValue>> {
        let mut sql = String::from("SELECT * FROM filter_value");
        if filter.is_some() {
            sql.push_str(" WHERE filter = $filter");
        }
        sql.push_str(" ORDER BY value ASC");

        let mut query = self.base.db().query(sql);
        if let Some(filter) = filter {
            query = query.bind(("filter", make_record_id("filter", filter)));
        }

        let values: Vec<FilterValue> = query.await?.take(0)?;
        Ok(values)
    }

    /// Find value by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<FilterValue>> {
        let key = strip_table_prefix(TABLE, id).to_string();
        let value: Option<FilterValue> = self.base.db().select((TABLE, key)).await?;
        Ok(value)
    }

    /// Values are unique per (filter, value)
    async fn find_by_value(&self, filter: &RecordId, value: &str) -> RepoResult<Option<FilterValue>> {
        let values: Vec<FilterValue> = self
            .base
            .db()
            .query("SELECT * FROM filter_value WHERE filter = $filter AND value = $value")
            .bind(("filter", filter.clone()))
            .bind(("value", value.to_string()))
            .await?
            .take(0)?;
        Ok(values.into_iter().next())
    }

    /// Create a value; the filter must exist, (filter, value) unique
    pub async fn create(&self, data: FilterValueCreate) -> RepoResult<FilterValue> {
        let filter = make_record_id("filter", &data.filter);
        let existing: Option<Filter> = self
            .base
            .db()
            .select(("filter", filter.key().to_string()))
            .await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!(
                "Filter {} not found",
                data.filter
            )));
        }

        if self.find_by_value(&filter, &data.value).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Value '{}' already exists for this filter",
                data.value
            )));
        }

        #[derive(Serialize)]
        struct InternalFilterValue {
            filter: RecordId,
            value: String,
            created_at: i64,
        }

        let filter_value = InternalFilterValue {
            filter,
            value: data.value,
            created_at: now_millis(),
        };

        let created: Option<FilterValue> =
            self.base.db().create(TABLE).content(filter_value).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create filter value".to_string()))
    }

    /// Update a value, re-checking (filter, value) uniqueness
    pub async fn update(&self, id: &str, data: FilterValueUpdate) -> RepoResult<FilterValue> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Filter value {} not found", id)))?;

        let Some(value) = data.value else {
            return Ok(existing);
        };

        if let Some(other) = self.find_by_value(&existing.filter, &value).await?
            && other.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Value '{}' already exists for this filter",
                value
            )));
        }

        let thing = existing
            .id
            .clone()
            .unwrap_or_else(|| make_record_id(TABLE, id));
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET value = $value RETURN AFTER")
            .bind(("thing", thing))
            .bind(("value", value))
            .await?;

        let updated: Option<FilterValue> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Filter value {} not found", id)))
    }

    /// Delete a value and detach it from any product referencing it
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Filter value {} not found", id)))?;

        let thing = existing
            .id
            .clone()
            .unwrap_or_else(|| make_record_id(TABLE, id));

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE product SET filter_values -= $fv WHERE filter_values CONTAINS $fv; \
                 DELETE $fv; \
                 COMMIT TRANSACTION;",
            )
            .bind(("fv", thing))
            .await?
            .check()?;

        Ok(())
    }
}
