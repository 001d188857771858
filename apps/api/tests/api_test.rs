//! Router tests driven in-process with `tower::ServiceExt::oneshot`.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use kasir_api::{create_app, AppState};
use kasir_core::{CategoryInput, ProductInput};
use kasir_db::{Database, DbConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    db: Database,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let router = create_app(AppState::new(db.clone(), Duration::from_secs(5)));
        TestApp { db, router }
    }

    async fn add_product(&self, name: &str, price: i64, stock: i64) -> i64 {
        self.db
            .products()
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

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

#[tokio::test]
async fn test_health_and_root() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["database"], "connected");

    let (status, _) = app.send(Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_checkout_then_report() {
    let app = TestApp::new().await;
    let a = app.add_product("Kopi Gadjah", 2000, 10).await;
    let b = app.add_product("Teh Tong Tji", 1500, 5).await;

    let (status, tx) = app
        .send(
            Method::POST,
            "/api/checkout",
            Some(json!([
                { "product_id": a, "quantity": 3 },
                { "product_id": b, "quantity": 2 }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["total_amount"], 9000);
    assert_eq!(tx["details"].as_array().unwrap().len(), 2);
    assert_eq!(tx["details"][0]["product_name"], "Kopi Gadjah");
    assert_eq!(tx["details"][1]["subtotal"], 3000);

    let id = tx["id"].as_i64().unwrap();
    let (status, stored) = app
        .send(Method::GET, &format!("/api/transactions/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, tx);

    let (_, product) = app.send(Method::GET, &format!("/api/produk/{a}"), None).await;
    assert_eq!(product["stock"], 7);

    let (status, report) = app.send(Method::GET, "/api/report/hari-ini", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_revenue"], 9000);
    assert_eq!(report["total_transactions"], 1);
    assert_eq!(report["best_seller"]["name"], "Kopi Gadjah");
    assert_eq!(report["best_seller"]["quantity_sold"], 3);
}

#[tokio::test]
async fn test_checkout_envelope_body() {
    let app = TestApp::new().await;
    let a = app.add_product("Indomie", 2500, 20).await;

    let (status, tx) = app
        .send(
            Method::POST,
            "/api/checkout",
            Some(json!({ "items": [{ "product_id": a, "quantity": 4 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["total_amount"], 10000);
}

#[tokio::test]
async fn test_checkout_failures() {
    let app = TestApp::new().await;
    let a = app.add_product("Panadol", 4700, 2).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/checkout",
            Some(json!([
                { "product_id": a, "quantity": 1 },
                { "product_id": 999, "quantity": 1 }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PRODUCT_NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("999"));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/checkout",
            Some(json!([{ "product_id": a, "quantity": 3 }])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (status, body) = app.send(Method::POST, "/api/checkout", Some(json!([]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_CHECKOUT");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/checkout",
            Some(json!([{ "product_id": a, "quantity": 0 }])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUANTITY");

    let (status, body) = app
        .send(Method::POST, "/api/checkout", Some(json!({ "cart": "nope" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Nothing moved.
    let (_, product) = app.send(Method::GET, &format!("/api/produk/{a}"), None).await;
    assert_eq!(product["stock"], 2);
    let (_, report) = app.send(Method::GET, "/api/report/hari-ini", None).await;
    assert_eq!(report["total_transactions"], 0);
    assert_eq!(report["best_seller"]["name"], "-");
}

#[tokio::test]
async fn test_product_crud() {
    let app = TestApp::new().await;
    let minuman = app
        .db
        .categories()
        .insert(&CategoryInput {
            name: "Minuman".to_string(),
            description: "Pelepas dahaga".to_string(),
        })
        .await
        .unwrap();

    let (status, created) = app
        .send(
            Method::POST,
            "/api/produk",
            Some(json!({
                "name": "Kopi Gadjah",
                "price": 2000,
                "stock": 10,
                "category_id": minuman.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["category"]["name"], "Minuman");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/produk/{id}"),
            Some(json!({ "name": "Kopi Gadjah Susu", "price": 2500, "stock": 8 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 2500);
    assert!(updated.get("category").is_none());

    let (status, list) = app.send(Method::GET, "/api/produk", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/produk",
            Some(json!({ "name": "Rusak", "price": -1, "stock": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/produk/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::GET, &format!("/api/produk/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_category_crud() {
    let app = TestApp::new().await;

    let (status, created) = app
        .send(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Obat", "description": "Obat mujarab" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Obat", "description": "lagi" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, fetched) = app
        .send(Method::GET, &format!("/api/categories/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/categories/{id}"),
            Some(json!({ "name": "Obat Bebas" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Obat Bebas");
    assert_eq!(updated["description"], "");

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/categories/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/categories/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = app.send(Method::GET, "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_transaction() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/transactions/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
