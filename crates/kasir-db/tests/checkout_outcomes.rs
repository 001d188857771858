//! What a caller is told about a checkout matches what was stored, including
//! when the deadline fires or the database goes away.

use std::time::Duration;

use kasir_core::{CheckoutItem, ProductInput};
use kasir_db::{CheckoutError, Database, DbConfig, DbError};
use tempfile::TempDir;

async fn file_database(dir: &TempDir) -> Database {
    Database::new(DbConfig::new(dir.path().join("kasir.db")))
        .await
        .unwrap()
}

async fn add_product(db: &Database, name: &str, price: i64, stock: i64) -> i64 {
    db.products()
        .insert(&ProductInput {
            name: name.to_string(),
            price,
            stock,
            category_id: None,
        })
        .await
        .unwrap()
        .product
        .id
}

async fn count(db: &Database, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(db.pool()).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timed_out_checkouts_store_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_database(&dir).await;
    let ids = [
        add_product(&db, "Kopi Gadjah", 2000, 10_000).await,
        add_product(&db, "Teh Tong Tji", 1500, 10_000).await,
        add_product(&db, "Indomie", 2500, 10_000).await,
    ];
    let cart: Vec<_> = ids.iter().map(|&id| CheckoutItem::new(id, 1)).collect();
    let repo = db.transactions();

    let mut committed = 0i64;
    let mut timed_out = 0i64;
    for us in (1..4000).step_by(7) {
        match repo
            .process_checkout_with_timeout(&cart, Duration::from_micros(us))
            .await
        {
            Ok(transaction) => {
                assert_eq!(transaction.details.len(), 3);
                committed += 1;
            }
            Err(CheckoutError::TimedOut(_)) => timed_out += 1,
            Err(other) => panic!("unexpected checkout failure: {other}"),
        }
    }

    let headers = count(&db, "SELECT COUNT(*) FROM transactions").await;
    let details = count(&db, "SELECT COUNT(*) FROM transaction_details").await;
    let sold = count(&db, "SELECT SUM(10000 - stock) FROM products").await;

    assert_eq!(committed + timed_out, (1..4000).step_by(7).count() as i64);
    assert_eq!(headers, committed);
    assert_eq!(details, 3 * headers);
    assert_eq!(sold, 3 * headers);
}

#[tokio::test]
async fn test_generous_deadline_commits() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_database(&dir).await;
    let kopi = add_product(&db, "Kopi Gadjah", 2000, 10).await;

    let transaction = db
        .transactions()
        .process_checkout_with_timeout(&[CheckoutItem::new(kopi, 3)], Duration::from_secs(10))
        .await
        .unwrap();

    assert_eq!(transaction.total_amount, 6000);
    let stored = db
        .transactions()
        .get_transaction(transaction.id)
        .await
        .unwrap();
    assert_eq!(stored, Some(transaction));
}

#[tokio::test]
async fn test_closed_pool_is_storage_failure() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_database(&dir).await;
    let panadol = add_product(&db, "Panadol", 4700, 2).await;
    let repo = db.transactions();

    db.close().await;

    let result = repo.process_checkout(&[CheckoutItem::new(panadol, 1)]).await;
    assert!(matches!(
        result,
        Err(CheckoutError::StorageFailure(DbError::ConnectionFailed(_)))
    ));

    let result = repo
        .process_checkout_with_timeout(&[CheckoutItem::new(panadol, 1)], Duration::from_secs(5))
        .await;
    assert!(matches!(result, Err(CheckoutError::StorageFailure(_))));

    // Reopened, the file shows nothing moved.
    let db = file_database(&dir).await;
    let product = db.products().get_by_id(panadol).await.unwrap().unwrap();
    assert_eq!(product.product.stock_quantity, 2);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM transactions").await, 0);
}
