//! Content tab ordering

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tempfile::TempDir;

use catalog_server::db::models::{CategoryCreate, ProductCreate, ProductTabCreate, ProductTabUpdate};
use catalog_server::db::repository::{
    CategoryRepository, ProductRepository, ProductTabRepository, SortOrderUpdate,
};
use rust_decimal::Decimal;

async fn test_db() -> (Surreal<Db>, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    (db, tmp)
}

async fn seed_product(db: &Surreal<Db>) -> String {
    let category = CategoryRepository::new(db.clone())
        .create(CategoryCreate {
            name: "Electronics".to_string(),
            parent: None,
        })
        .await
        .unwrap();

    let product = ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: "Monitor".to_string(),
            category: category.id.unwrap().to_string(),
            description: None,
            price: Decimal::new(12900, 2),
            old_price: None,
            quantity: None,
            filter_values: Vec::new(),
        })
        .await
        .unwrap();

    product.id.unwrap().to_string()
}

async fn add_tab(repo: &ProductTabRepository, product: &str, title: &str) -> String {
    tokio::time::sleep(Duration::from_millis(5)).await;
    let tab = repo
        .create(ProductTabCreate {
            product: product.to_string(),
            title: title.to_string(),
            content: format!("{title} content"),
        })
        .await
        .unwrap();
    tab.id.unwrap().to_string()
}

#[tokio::test]
async fn tabs_append_in_order() {
    let (db, _tmp) = test_db().await;
    let product = seed_product(&db).await;
    let repo = ProductTabRepository::new(db.clone());

    add_tab(&repo, &product, "Description").await;
    add_tab(&repo, &product, "Specifications").await;
    add_tab(&repo, &product, "Warranty").await;

    let tabs = repo.find_by_product(&product).await.unwrap();
    let orders: Vec<_> = tabs.iter().map(|t| t.sort_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(tabs[0].title, "Description");
}

#[tokio::test]
async fn tab_create_requires_existing_product() {
    let (db, _tmp) = test_db().await;
    let repo = ProductTabRepository::new(db.clone());

    let err = repo
        .create(ProductTabCreate {
            product: "product:missing".to_string(),
            title: "Orphan".to_string(),
            content: "nope".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn tab_reorder_drives_listing() {
    let (db, _tmp) = test_db().await;
    let product = seed_product(&db).await;
    let repo = ProductTabRepository::new(db.clone());

    let a = add_tab(&repo, &product, "First").await;
    let b = add_tab(&repo, &product, "Second").await;
    let c = add_tab(&repo, &product, "Third").await;

    // Gaps and arbitrary integers are fine; only relative order matters
    repo.reorder(&[
        SortOrderUpdate {
            id: a.clone(),
            sort_order: 100,
        },
        SortOrderUpdate {
            id: b.clone(),
            sort_order: -3,
        },
        SortOrderUpdate {
            id: c.clone(),
            sort_order: 50,
        },
    ])
    .await
    .unwrap();

    let tabs = repo.find_by_product(&product).await.unwrap();
    let ids: Vec<_> = tabs
        .iter()
        .map(|t| t.id.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![b, c, a]);
}

#[tokio::test]
async fn tab_update_touches_fields() {
    let (db, _tmp) = test_db().await;
    let product = seed_product(&db).await;
    let repo = ProductTabRepository::new(db.clone());

    let id = add_tab(&repo, &product, "Draft").await;

    let updated = repo
        .update(
            &id,
            ProductTabUpdate {
                title: Some("Final".to_string()),
                content: None,
                sort_order: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "Draft content");
    assert!(updated.updated_at >= updated.created_at);
}
