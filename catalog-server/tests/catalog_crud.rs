//! Category tree, filters and cascade behavior

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tempfile::TempDir;

use catalog_server::db::models::{
    CategoryCreate, CategoryUpdate, FilterCreate, FilterValueCreate, ProductCreate,
    ProductPhotoCreate, ProductTabCreate,
};
use catalog_server::db::repository::{
    CategoryRepository, FilterRepository, FilterValueRepository, ProductPhotoRepository,
    ProductRepository, ProductTabRepository, RepoError,
};
use rust_decimal::Decimal;

async fn test_db() -> (Surreal<Db>, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    (db, tmp)
}

fn product_create(name: &str, category: &str) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        category: category.to_string(),
        description: None,
        price: Decimal::new(999, 2),
        old_price: None,
        quantity: None,
        filter_values: Vec::new(),
    }
}

#[tokio::test]
async fn category_cannot_be_its_own_parent() {
    let (db, _tmp) = test_db().await;
    let repo = CategoryRepository::new(db.clone());

    let category = repo
        .create(CategoryCreate {
            name: "Loop".to_string(),
            parent: None,
        })
        .await
        .unwrap();
    let id = category.id.unwrap().to_string();

    let err = repo
        .update(
            &id,
            CategoryUpdate {
                name: None,
                parent: Some(id.clone()),
                is_active: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Nothing was persisted
    let reloaded = repo.find_by_id(&id).await.unwrap().unwrap();
    assert!(reloaded.parent.is_none());
}

#[tokio::test]
async fn create_with_missing_parent_is_not_found() {
    let (db, _tmp) = test_db().await;
    let repo = CategoryRepository::new(db.clone());

    let err = repo
        .create(CategoryCreate {
            name: "Orphan".to_string(),
            parent: Some("category:missing".to_string()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn children_returns_immediate_active_only() {
    let (db, _tmp) = test_db().await;
    let repo = CategoryRepository::new(db.clone());

    let root = repo
        .create(CategoryCreate {
            name: "Root".to_string(),
            parent: None,
        })
        .await
        .unwrap();
    let root_id = root.id.unwrap().to_string();

    let child = repo
        .create(CategoryCreate {
            name: "Child".to_string(),
            parent: Some(root_id.clone()),
        })
        .await
        .unwrap();
    let child_id = child.id.unwrap().to_string();

    // Grandchild must not appear in root's children
    repo.create(CategoryCreate {
        name: "Grandchild".to_string(),
        parent: Some(child_id.clone()),
    })
    .await
    .unwrap();

    // Deactivated children are hidden from nested presentation
    let hidden = repo
        .create(CategoryCreate {
            name: "Hidden".to_string(),
            parent: Some(root_id.clone()),
        })
        .await
        .unwrap();
    repo.toggle_active(&hidden.id.unwrap().to_string())
        .await
        .unwrap();

    let children = repo.find_children(&root_id).await.unwrap();
    let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Child"]);
}

#[tokio::test]
async fn toggle_active_flips_and_returns() {
    let (db, _tmp) = test_db().await;
    let repo = CategoryRepository::new(db.clone());

    let category = repo
        .create(CategoryCreate {
            name: "Seasonal".to_string(),
            parent: None,
        })
        .await
        .unwrap();
    let id = category.id.unwrap().to_string();
    assert!(category.is_active);

    let off = repo.toggle_active(&id).await.unwrap();
    assert!(!off.is_active);
    let on = repo.toggle_active(&id).await.unwrap();
    assert!(on.is_active);
}

#[tokio::test]
async fn filter_names_unique_per_category() {
    let (db, _tmp) = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let filters = FilterRepository::new(db.clone());

    let a = categories
        .create(CategoryCreate {
            name: "A".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let b = categories
        .create(CategoryCreate {
            name: "B".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    filters
        .create(FilterCreate {
            name: "Color".to_string(),
            category: a.clone(),
        })
        .await
        .unwrap();

    // Same name in the same category is a conflict
    let err = filters
        .create(FilterCreate {
            name: "Color".to_string(),
            category: a.clone(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Same name in a different category is fine
    filters
        .create(FilterCreate {
            name: "Color".to_string(),
            category: b,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn filter_values_unique_per_filter() {
    let (db, _tmp) = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let filters = FilterRepository::new(db.clone());
    let values = FilterValueRepository::new(db.clone());

    let cat = categories
        .create(CategoryCreate {
            name: "Shoes".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let filter = filters
        .create(FilterCreate {
            name: "Size".to_string(),
            category: cat,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    values
        .create(FilterValueCreate {
            filter: filter.clone(),
            value: "42".to_string(),
        })
        .await
        .unwrap();

    let err = values
        .create(FilterValueCreate {
            filter: filter.clone(),
            value: "42".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn product_filter_value_attach_detach() {
    let (db, _tmp) = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let filters = FilterRepository::new(db.clone());
    let values = FilterValueRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());

    let cat = categories
        .create(CategoryCreate {
            name: "Shirts".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let filter = filters
        .create(FilterCreate {
            name: "Color".to_string(),
            category: cat.clone(),
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let red = values
        .create(FilterValueCreate {
            filter,
            value: "Red".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    let product = products.create(product_create("Tee", &cat)).await.unwrap();
    let product_id = product.id.unwrap().to_string();

    // Attach is idempotent (set semantics)
    products.add_filter_value(&product_id, &red).await.unwrap();
    let updated = products.add_filter_value(&product_id, &red).await.unwrap();
    assert_eq!(updated.filter_values.len(), 1);

    let attached = products.find_filter_values(&product_id).await.unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].value, "Red");

    let updated = products
        .remove_filter_value(&product_id, &red)
        .await
        .unwrap();
    assert!(updated.filter_values.is_empty());
}

#[tokio::test]
async fn deleting_filter_value_detaches_products() {
    let (db, _tmp) = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let filters = FilterRepository::new(db.clone());
    let values = FilterValueRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());

    let cat = categories
        .create(CategoryCreate {
            name: "Pants".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let filter = filters
        .create(FilterCreate {
            name: "Fit".to_string(),
            category: cat.clone(),
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let slim = values
        .create(FilterValueCreate {
            filter,
            value: "Slim".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    let product = products.create(product_create("Jeans", &cat)).await.unwrap();
    let product_id = product.id.unwrap().to_string();
    products.add_filter_value(&product_id, &slim).await.unwrap();

    values.delete(&slim).await.unwrap();

    let reloaded = products.find_by_id(&product_id).await.unwrap().unwrap();
    assert!(reloaded.filter_values.is_empty());
}

#[tokio::test]
async fn category_delete_cascades_subtree() {
    let (db, _tmp) = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let filters = FilterRepository::new(db.clone());
    let values = FilterValueRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());
    let photos = ProductPhotoRepository::new(db.clone());
    let tabs = ProductTabRepository::new(db.clone());

    let root = categories
        .create(CategoryCreate {
            name: "Outdoor".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let child = categories
        .create(CategoryCreate {
            name: "Tents".to_string(),
            parent: Some(root.clone()),
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    let filter = filters
        .create(FilterCreate {
            name: "Capacity".to_string(),
            category: child.clone(),
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let fv = values
        .create(FilterValueCreate {
            filter: filter.clone(),
            value: "2 person".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    let product = products
        .create(product_create("Dome Tent", &child))
        .await
        .unwrap();
    let product_id = product.id.unwrap().to_string();
    products.add_filter_value(&product_id, &fv).await.unwrap();

    photos
        .create(ProductPhotoCreate {
            product: product_id.clone(),
            image: "tent.jpg".to_string(),
            is_main: None,
        })
        .await
        .unwrap();
    tabs.create(ProductTabCreate {
        product: product_id.clone(),
        title: "Setup".to_string(),
        content: "Pitch it".to_string(),
    })
    .await
    .unwrap();

    categories.delete(&root).await.unwrap();

    assert!(categories.find_by_id(&root).await.unwrap().is_none());
    assert!(categories.find_by_id(&child).await.unwrap().is_none());
    assert!(products.find_by_id(&product_id).await.unwrap().is_none());
    assert!(filters.find_by_id(&filter).await.unwrap().is_none());
    assert!(values.find_by_id(&fv).await.unwrap().is_none());
    assert!(photos.find_by_product(&product_id).await.unwrap().is_empty());
    assert!(tabs.find_by_product(&product_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn product_delete_cascades_photos_and_tabs() {
    let (db, _tmp) = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());
    let photos = ProductPhotoRepository::new(db.clone());
    let tabs = ProductTabRepository::new(db.clone());

    let cat = categories
        .create(CategoryCreate {
            name: "Bags".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let product = products
        .create(product_create("Backpack", &cat))
        .await
        .unwrap();
    let product_id = product.id.unwrap().to_string();

    photos
        .create(ProductPhotoCreate {
            product: product_id.clone(),
            image: "bag.jpg".to_string(),
            is_main: None,
        })
        .await
        .unwrap();
    tabs.create(ProductTabCreate {
        product: product_id.clone(),
        title: "Materials".to_string(),
        content: "Nylon".to_string(),
    })
    .await
    .unwrap();

    products.delete(&product_id).await.unwrap();

    assert!(products.find_by_id(&product_id).await.unwrap().is_none());
    assert!(photos.find_by_product(&product_id).await.unwrap().is_empty());
    assert!(tabs.find_by_product(&product_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn product_listing_filters_by_category_and_active() {
    let (db, _tmp) = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());

    let a = categories
        .create(CategoryCreate {
            name: "A".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let b = categories
        .create(CategoryCreate {
            name: "B".to_string(),
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    let p1 = products.create(product_create("One", &a)).await.unwrap();
    products.create(product_create("Two", &a)).await.unwrap();
    products.create(product_create("Three", &b)).await.unwrap();

    products
        .toggle_active(&p1.id.unwrap().to_string())
        .await
        .unwrap();

    let in_a = products.find_all(Some(&a), None).await.unwrap();
    assert_eq!(in_a.len(), 2);

    let active_in_a = products.find_all(Some(&a), Some(true)).await.unwrap();
    assert_eq!(active_in_a.len(), 1);
    assert_eq!(active_in_a[0].name, "Two");

    let inactive = products.find_all(None, Some(false)).await.unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].name, "One");
}
