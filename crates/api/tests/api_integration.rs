//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use common::ManualClock;
use inventory_store::InMemoryStore;
use metrics_exporter_prometheus::PrometheusHandle;
use reporting::DayBoundary;
use serde_json::{Value, json};
use tower::ServiceExt;

use api::config::Config;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    router: axum::Router,
    clock: ManualClock,
}

async fn setup() -> TestApp {
    let metrics_handle = get_metrics_handle();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
    let store = InMemoryStore::with_clock(clock.clone());
    ledger::bootstrap_admin(&store, "admin", "admin123")
        .await
        .unwrap();

    let mut config = Config::default();
    config.day_boundary = DayBoundary::Utc;
    let state = api::create_default_state(store.clone(), Arc::new(clock.clone()), &config);
    TestApp {
        router: api::create_app(state, metrics_handle),
        clock,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    async fn create_product(&self, name: &str, sku: &str, stock: i64) -> u64 {
        let (status, body) = self
            .post(
                "/api/products",
                json!({"name": name, "sku": sku, "category": "office", "currentStock": stock}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_u64().unwrap()
    }

    async fn record(&self, product_id: u64, kind: &str, quantity: i64) -> (StatusCode, Value) {
        self.post(
            "/api/transactions",
            json!({"productId": product_id, "type": kind, "quantity": quantity}),
        )
        .await
    }
}

fn field_names(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

mod auth {
    use super::*;

    #[tokio::test]
    async fn test_login_returns_user() {
        let app = setup().await;
        let (status, body) = app
            .post(
                "/api/auth/login",
                json!({"username": "admin", "password": "admin123"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], 1);
        assert_eq!(body["user"]["username"], "admin");
        assert!(body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let app = setup().await;
        let (status, body) = app
            .post(
                "/api/auth/login",
                json!({"username": "admin", "password": "wrong"}),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_missing_fields_is_bad_request() {
        let app = setup().await;
        let (status, body) = app.post("/api/auth/login", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(field_names(&body), vec!["username", "password"]);
    }

    #[tokio::test]
    async fn test_login_malformed_json_is_bad_request() {
        let app = setup().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = app.send_request(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }
}

mod products {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_product() {
        let app = setup().await;
        let (status, created) = app
            .post(
                "/api/products",
                json!({"name": "Widget", "sku": "W-1", "category": "office", "currentStock": 10}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Widget");
        assert_eq!(created["currentStock"], 10);
        assert!(created["createdAt"].is_string());

        let id = created["id"].as_u64().unwrap();
        let (status, fetched) = app.get(&format!("/api/products/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_current_stock_defaults_to_zero() {
        let app = setup().await;
        let (status, created) = app
            .post(
                "/api/products",
                json!({"name": "Widget", "sku": "W-1", "category": "office"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["currentStock"], 0);
    }

    #[tokio::test]
    async fn test_create_invalid_product_lists_fields() {
        let app = setup().await;
        let (status, body) = app
            .post(
                "/api/products",
                json!({"name": "", "sku": "W-1", "category": " ", "currentStock": -1}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid input");
        assert_eq!(field_names(&body), vec!["name", "category", "currentStock"]);
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_rejected() {
        let app = setup().await;
        app.create_product("Widget", "W-1", 1).await;

        let (status, body) = app
            .post(
                "/api/products",
                json!({"name": "Other", "sku": "W-1", "category": "misc", "currentStock": 0}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "SKU already exists");
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let app = setup().await;
        let (status, body) = app.get("/api/products/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let app = setup().await;
        let (status, _) = app.get("/api/products/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_filterable() {
        let app = setup().await;
        app.create_product("Stapler", "ST-1", 20).await;
        app.create_product("Pen", "PN-1", 3).await;
        app.create_product("Eraser", "ER-1", 0).await;

        let (status, body) = app.get("/api/products").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Eraser", "Pen", "Stapler"]);

        let (_, body) = app.get("/api/products?search=st-").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["sku"], "ST-1");

        let (_, body) = app.get("/api/products?stockStatus=out-of-stock").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Eraser");

        let (status, _) = app.get("/api/products?stockStatus=plenty").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_product() {
        let app = setup().await;
        let id = app.create_product("Widget", "W-1", 10).await;

        let (status, body) = app
            .send(
                "PUT",
                &format!("/api/products/{id}"),
                Some(json!({"category": "stationery", "sku": "W-1"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "stationery");
        assert_eq!(body["name"], "Widget");
        assert_eq!(body["currentStock"], 10);
    }

    #[tokio::test]
    async fn test_update_to_taken_sku_is_rejected() {
        let app = setup().await;
        app.create_product("Widget", "W-1", 10).await;
        let other = app.create_product("Gadget", "G-1", 10).await;

        let (status, body) = app
            .send(
                "PUT",
                &format!("/api/products/{other}"),
                Some(json!({"sku": "W-1"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "SKU already exists");
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let app = setup().await;
        let (status, _) = app
            .send("PUT", "/api/products/5", Some(json!({"name": "Ghost"})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let app = setup().await;
        let id = app.create_product("Widget", "W-1", 10).await;

        let (status, body) = app.send("DELETE", &format!("/api/products/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = app.send("DELETE", &format!("/api/products/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod transactions {
    use super::*;

    #[tokio::test]
    async fn test_widget_example() {
        let app = setup().await;
        let id = app.create_product("Widget", "W-1", 10).await;

        let (status, tx) = app.record(id, "OUT", 3).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tx["type"], "OUT");
        assert_eq!(tx["quantity"], 3);
        assert_eq!(tx["productId"], id);
        let (_, product) = app.get(&format!("/api/products/{id}")).await;
        assert_eq!(product["currentStock"], 7);

        let (status, body) = app.record(id, "OUT", 100).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Insufficient stock");
        let (_, product) = app.get(&format!("/api/products/{id}")).await;
        assert_eq!(product["currentStock"], 7);

        let (_, history) = app.get("/api/transactions").await;
        assert_eq!(history.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let app = setup().await;
        let (status, body) = app.record(404, "IN", 1).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_invalid_movement_lists_fields() {
        let app = setup().await;
        let (status, body) = app
            .post(
                "/api/transactions",
                json!({"type": "SIDEWAYS", "quantity": 0}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(field_names(&body), vec!["productId", "type", "quantity"]);
    }

    #[tokio::test]
    async fn test_wrongly_typed_quantity_names_the_field() {
        let app = setup().await;
        let id = app.create_product("Widget", "W-1", 10).await;
        let (status, body) = app
            .post(
                "/api/transactions",
                json!({"productId": id, "type": "IN", "quantity": "5"}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid input");
        assert_eq!(field_names(&body), vec!["quantity"]);

        let (_, product) = app.get(&format!("/api/products/{id}")).await;
        assert_eq!(product["currentStock"], 10);
    }

    #[tokio::test]
    async fn test_stock_in_beyond_limit_is_rejected() {
        let app = setup().await;
        let id = app
            .create_product("Widget", "W-1", i64::from(u32::MAX) - 1)
            .await;

        let (status, body) = app.record(id, "IN", 5).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Stock limit exceeded");

        let (_, product) = app.get(&format!("/api/products/{id}")).await;
        assert_eq!(product["currentStock"], u32::MAX - 1);
        let (_, history) = app.get("/api/transactions").await;
        assert!(history.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notes_are_kept() {
        let app = setup().await;
        let id = app.create_product("Widget", "W-1", 0).await;
        let (status, tx) = app
            .post(
                "/api/transactions",
                json!({"productId": id, "type": "IN", "quantity": 5, "notes": "supplier delivery"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tx["notes"], "supplier delivery");
    }

    #[tokio::test]
    async fn test_list_joins_products_and_filters() {
        let app = setup().await;
        let widget = app.create_product("Widget", "W-1", 10).await;
        let gadget = app.create_product("Gadget", "G-1", 10).await;
        app.record(widget, "IN", 2).await;
        app.clock.advance(Duration::minutes(1));
        app.record(gadget, "OUT", 1).await;

        let (status, all) = app.get("/api/transactions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all[0]["productName"], "Gadget");
        assert_eq!(all[1]["productName"], "Widget");
        assert_eq!(all[1]["productSku"], "W-1");

        let (_, widget_only) = app
            .get(&format!("/api/transactions?productId={widget}"))
            .await;
        assert_eq!(widget_only.as_array().unwrap().len(), 1);

        let (_, outs) = app.get("/api/transactions?type=OUT").await;
        assert_eq!(outs.as_array().unwrap().len(), 1);
        assert_eq!(outs[0]["productId"], gadget);

        let (_, early) = app
            .get("/api/transactions?to=2024-06-01T09:00:30Z")
            .await;
        assert_eq!(early.as_array().unwrap().len(), 1);
        assert_eq!(early[0]["productName"], "Widget");

        let (status, _) = app.get("/api/transactions?productId=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deleted_product_history_uses_sentinels() {
        let app = setup().await;
        let id = app.create_product("Widget", "W-1", 10).await;
        app.record(id, "OUT", 4).await;
        app.send("DELETE", &format!("/api/products/{id}"), None).await;

        let (_, history) = app
            .get(&format!("/api/transactions?productId={id}"))
            .await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["productName"], "Unknown Product");
        assert_eq!(history[0]["productSku"], "Unknown SKU");
    }
}

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn test_metrics_count_today_only() {
        let app = setup().await;
        let widget = app.create_product("Widget", "W-1", 50).await;
        app.create_product("Pen", "PN-1", 2).await;

        app.record(widget, "IN", 10).await;
        app.clock.advance(Duration::days(1));
        app.record(widget, "IN", 3).await;
        app.record(widget, "OUT", 5).await;

        let (status, body) = app.get("/api/dashboard/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "totalProducts": 2,
                "stockInToday": 3,
                "stockOutToday": 5,
                "lowStockItems": 1
            })
        );
    }

    #[tokio::test]
    async fn test_recent_transactions_newest_first() {
        let app = setup().await;
        let id = app.create_product("Widget", "W-1", 0).await;
        let mut ids = Vec::new();
        for qty in 1..=3 {
            let (_, tx) = app.record(id, "IN", qty).await;
            ids.push(tx["id"].clone());
            app.clock.advance(Duration::seconds(10));
        }

        let (status, body) = app
            .get("/api/dashboard/recent-transactions?limit=2")
            .await;
        assert_eq!(status, StatusCode::OK);
        let got: Vec<_> = body.as_array().unwrap().iter().map(|t| t["id"].clone()).collect();
        assert_eq!(got, vec![ids[2].clone(), ids[1].clone()]);
        assert_eq!(body[0]["productName"], "Widget");
    }

    #[tokio::test]
    async fn test_recent_transactions_bad_limit_uses_default() {
        let app = setup().await;
        let id = app.create_product("Widget", "W-1", 0).await;
        for _ in 0..12 {
            app.record(id, "IN", 1).await;
        }

        for uri in [
            "/api/dashboard/recent-transactions",
            "/api/dashboard/recent-transactions?limit=abc",
            "/api/dashboard/recent-transactions?limit=0",
        ] {
            let (status, body) = app.get(uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body.as_array().unwrap().len(), 10, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_low_stock_threshold() {
        let app = setup().await;
        app.create_product("Plenty", "PL-1", 40).await;
        app.create_product("Seven", "SV-1", 7).await;
        app.create_product("Two", "TW-1", 2).await;
        app.create_product("Zero", "ZR-1", 0).await;

        let (status, body) = app.get("/api/dashboard/low-stock").await;
        assert_eq!(status, StatusCode::OK);
        let skus: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["sku"].as_str().unwrap())
            .collect();
        assert_eq!(skus, vec!["ZR-1", "TW-1"]);

        let (_, body) = app.get("/api/dashboard/low-stock?threshold=10").await;
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (_, body) = app.get("/api/dashboard/low-stock?threshold=nope").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_counters() {
    let app = setup().await;
    let id = app.create_product("Widget", "W-1", 1).await;
    app.record(id, "IN", 1).await;

    let (status, body) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("inventory_products_created_total"));
    assert!(text.contains("inventory_transactions_recorded_total"));
}
