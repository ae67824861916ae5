//! Ordering helpers for parent-scoped collections (photos, tabs)
//!
//! The sort key is a sparse integer: gaps and duplicates are legal, read
//! queries order by (sort_order, created_at). Appends take max+1 of the
//! sibling set; the compute-then-write pair is not atomic, so two
//! concurrent appends may assign the same value - the created_at tie-break
//! keeps the displayed order deterministic.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{RepoResult, make_record_id};

/// One (id, sort_order) reassignment of a bulk reorder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortOrderUpdate {
    pub id: String,
    pub sort_order: i32,
}

/// Next sort_order for an append: max over the parent's items, plus one.
///
/// The max is computed client-side from a VALUE projection; the embedded
/// engine has a known ORDER BY + LIMIT issue, so no "top 1" query here.
pub async fn next_sort_order(
    db: &Surreal<Db>,
    table: &str,
    parent: &RecordId,
) -> RepoResult<i32> {
    let orders: Vec<i32> = db
        .query(format!(
            "SELECT VALUE sort_order FROM {table} WHERE product = $parent"
        ))
        .bind(("parent", parent.clone()))
        .await?
        .take(0)?;
    Ok(orders.into_iter().max().unwrap_or(0) + 1)
}

/// Apply a batch of sort_order reassignments as a single transaction.
///
/// Entries referencing unknown ids are skipped (UPDATE on a missing record
/// is a no-op); either every remaining update commits or none do.
pub async fn apply_sort_orders(
    db: &Surreal<Db>,
    table: &str,
    updates: &[SortOrderUpdate],
) -> RepoResult<()> {
    if updates.is_empty() {
        return Ok(());
    }

    let mut sql = String::from("BEGIN TRANSACTION;");
    for i in 0..updates.len() {
        sql.push_str(&format!(" UPDATE $id_{i} SET sort_order = $order_{i};"));
    }
    sql.push_str(" COMMIT TRANSACTION;");

    let mut query = db.query(sql);
    for (i, update) in updates.iter().enumerate() {
        query = query
            .bind((format!("id_{i}"), make_record_id(table, &update.id)))
            .bind((format!("order_{i}"), update.sort_order));
    }

    query.await?.check()?;
    Ok(())
}
