//! HTTP tests driving the router against in-memory SQLite.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_api::{router, ApiConfig, AppState};
use storefront_core::checkout::UnknownProductPolicy;
use storefront_core::{NewProduct, Role};
use storefront_db::{CheckoutMode, Database, DbConfig};

const ADMIN: &str = "admin-1";
const SHOPPER: &str = "user-1";

struct TestApp {
    app: Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(ApiConfig::default()).await
    }

    async fn with_config(config: ApiConfig) -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = router(AppState::new(db.clone(), config));
        TestApp { app, db }
    }

    /// Category "Tea" with one product per `(name, price_cents)`.
    async fn seed(&self, products: &[(&str, i64)]) -> (i64, Vec<i64>) {
        let category = self.db.categories().insert("Tea").await.unwrap();

        let mut ids = Vec::new();
        for (name, price_cents) in products {
            let product = self
                .db
                .products()
                .insert(&NewProduct {
                    name: name.to_string(),
                    description: format!("{} leaves", name),
                    price_cents: *price_cents,
                    stock: 10,
                    category_id: category.id,
                    image_url: String::new(),
                })
                .await
                .unwrap();
            ids.push(product.id);
        }

        (category.id, ids)
    }

    async fn make_admin(&self) {
        self.db
            .users()
            .upsert(ADMIN, "admin@shop.test", "Admin")
            .await
            .unwrap();
        self.db.users().set_role(ADMIN, Role::Admin).await.unwrap();
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn get(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, user, None).await
    }

    async fn post(&self, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, user, Some(body)).await
    }

    async fn put(&self, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, user, Some(body)).await
    }

    async fn delete(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, user, None).await
    }
}

// =============================================================================
// Health & Catalog
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_products_uses_placeholder_image() {
    let app = TestApp::new().await;
    app.seed(&[("Earl Grey", 650), ("Sencha", 899)]).await;

    let (status, body) = app.get("/api/products/fetch", None).await;
    assert_eq!(status, StatusCode::OK);

    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 2);
    // newest first
    assert_eq!(listings[0]["name"], "Sencha");
    assert_eq!(listings[0]["price_cents"], 899);
    assert_eq!(
        listings[1]["image_url"],
        "https://via.placeholder.com/300x300?text=Earl+Grey"
    );
}

#[tokio::test]
async fn test_get_product() {
    let app = TestApp::new().await;
    let (category_id, ids) = app.seed(&[("Sencha", 899)]).await;

    let (status, body) = app.get(&format!("/api/products/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sencha");
    assert_eq!(body["category_id"], category_id);

    let (status, body) = app.get("/api/products/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = app.get("/api/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_product_lookups() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 899), ("Assam", 599)]).await;

    let (status, body) = app
        .post("/api/products/by-id", None, json!({ "ids": [ids[1], 404] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Assam");

    let (status, body) = app.post("/api/products/by-id", None, json!({ "ids": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.post("/api/products/by-id", None, json!({ "ids": [0] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .post("/api/products/by-ids", None, json!({ "ids": ids.clone() }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0], json!({ "id": ids[0], "name": "Sencha", "price_cents": 899 }));

    let (status, body) = app.post("/api/products/by-ids", None, json!({ "ids": [] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_categories() {
    let app = TestApp::new().await;
    let (category_id, _) = app.seed(&[]).await;

    let (status, body) = app.get("/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": category_id, "name": "Tea" }]));
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/checkout")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"user_id\": "))
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Admin Products
// =============================================================================

#[tokio::test]
async fn test_create_product_requires_admin() {
    let app = TestApp::new().await;
    let (category_id, _) = app.seed(&[]).await;
    let body = json!({
        "name": "Genmaicha",
        "price_cents": 749,
        "category_id": category_id,
        "image_file_name": "genmaicha.png"
    });

    let (status, _) = app.post("/api/products", None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // no user row
    let (status, resp) = app.post("/api/products", Some(SHOPPER), body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["code"], "FORBIDDEN");

    // customer role
    app.db
        .users()
        .upsert(SHOPPER, "shopper@shop.test", "Shopper")
        .await
        .unwrap();
    let (status, _) = app.post("/api/products", Some(SHOPPER), body).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.db.products().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_admin_creates_product() {
    let config = ApiConfig {
        image_base_url: "https://bucket.test/product-images".to_string(),
        ..ApiConfig::default()
    };
    let app = TestApp::with_config(config).await;
    let (category_id, _) = app.seed(&[]).await;
    app.make_admin().await;

    let (status, body) = app
        .post(
            "/api/products",
            Some(ADMIN),
            json!({
                "name": "Genmaicha",
                "price_cents": 749,
                "category_id": category_id,
                "image_file_name": "genmaicha.png"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["product"]["stock"], 0);
    assert_eq!(body["product"]["description"], "");
    assert_eq!(
        body["product"]["image_url"],
        "https://bucket.test/product-images/genmaicha.png"
    );
}

#[tokio::test]
async fn test_create_product_validation() {
    let app = TestApp::new().await;
    let (category_id, _) = app.seed(&[]).await;
    app.make_admin().await;

    let (status, body) = app
        .post(
            "/api/products",
            Some(ADMIN),
            json!({
                "name": "Free Tea",
                "price_cents": 0,
                "category_id": category_id,
                "image_file_name": "free.png"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .post(
            "/api/products",
            Some(ADMIN),
            json!({
                "name": "Sneaky",
                "price_cents": 100,
                "category_id": category_id,
                "image_file_name": "../etc/passwd"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/products",
            Some(ADMIN),
            json!({
                "name": "Orphan",
                "price_cents": 100,
                "category_id": 999,
                "image_file_name": "orphan.png"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Persisted Cart
// =============================================================================

#[tokio::test]
async fn test_cart_requires_user_header() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/cart/items", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.get("/api/cart/items", Some("   ")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cart_add_increments() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 899)]).await;

    let (status, _) = app
        .post("/api/cart/items", Some(SHOPPER), json!({ "product_id": ids[0] }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/cart/items",
            Some(SHOPPER),
            json!({ "product_id": ids[0], "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["lines"][0]["quantity"], 3);
    assert_eq!(body["subtotal_cents"], 3 * 899);
}

#[tokio::test]
async fn test_cart_set_remove_and_errors() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 899), ("Assam", 599)]).await;

    let (status, body) = app
        .put(
            &format!("/api/cart/items/{}", ids[1]),
            Some(SHOPPER),
            json!({ "quantity": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_quantity"], 4);

    let (status, body) = app
        .put(
            &format!("/api/cart/items/{}", ids[1]),
            Some(SHOPPER),
            json!({ "quantity": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .post("/api/cart/items", Some(SHOPPER), json!({ "product_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app
        .delete(&format!("/api/cart/items/{}", ids[0]), Some(SHOPPER))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .delete(&format!("/api/cart/items/{}", ids[1]), Some(SHOPPER))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"], json!([]));
}

#[tokio::test]
async fn test_cart_quantity_limit() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 899)]).await;

    let (status, _) = app
        .post(
            "/api/cart/items",
            Some(SHOPPER),
            json!({ "product_id": ids[0], "quantity": 999 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/cart/items", Some(SHOPPER), json!({ "product_id": ids[0] }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CART_ERROR");
}

#[tokio::test]
async fn test_clear_cart_only_touches_caller() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 899)]).await;

    for user in [SHOPPER, "user-2"] {
        app.post("/api/cart/items", Some(user), json!({ "product_id": ids[0] }))
            .await;
    }

    let (status, body) = app.delete("/api/cart/items", Some(SHOPPER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"], json!([]));

    let (_, other) = app.get("/api/cart/items", Some("user-2")).await;
    assert_eq!(other["total_quantity"], 1);
}

#[tokio::test]
async fn test_client_cart_lookup() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 899)]).await;

    let (status, body) = app
        .post("/api/cart", None, json!({ "productIds": [ids[0]] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Sencha");
    assert_eq!(body[0]["price_cents"], 899);

    let (status, _) = app.post("/api/cart", None, json!({ "productIds": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/cart", None, json!({ "productIds": [-1] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Checkout & History
// =============================================================================

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 500)]).await;

    app.post(
        "/api/cart/items",
        Some(SHOPPER),
        json!({ "product_id": ids[0], "quantity": 2 }),
    )
    .await;

    let (status, body) = app
        .post(
            "/api/checkout",
            Some(SHOPPER),
            json!({
                "user_id": SHOPPER,
                "items": [{ "product_id": ids[0], "quantity": 2 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order placed successfully");
    let order_id = body["order_id"].as_i64().unwrap();

    let order = app.db.orders().get_by_id(order_id).await.unwrap().unwrap();
    assert_eq!(order.total_cents, 1000);

    let lines = app.db.orders().lines(order_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].price_cents, 500);
    assert_eq!(lines[0].quantity, 2);

    let (_, cart) = app.get("/api/cart/items", Some(SHOPPER)).await;
    assert_eq!(cart["lines"], json!([]));
}

#[tokio::test]
async fn test_checkout_by_other_caller_keeps_cart() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 500)]).await;

    app.post(
        "/api/cart/items",
        Some(SHOPPER),
        json!({ "product_id": ids[0], "quantity": 2 }),
    )
    .await;

    let order = json!({
        "user_id": SHOPPER,
        "items": [{ "product_id": ids[0], "quantity": 1 }]
    });

    let (status, _) = app.post("/api/checkout", None, order.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post("/api/checkout", Some("user-2"), order).await;
    assert_eq!(status, StatusCode::OK);

    let (_, cart) = app.get("/api/cart/items", Some(SHOPPER)).await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["lines"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_checkout_rejects_oversized_order() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 500)]).await;

    let items: Vec<Value> = (0..storefront_core::MAX_CHECKOUT_ITEMS + 1)
        .map(|_| json!({ "product_id": ids[0], "quantity": 1 }))
        .collect();

    let (status, body) = app
        .post(
            "/api/checkout",
            Some(SHOPPER),
            json!({ "user_id": SHOPPER, "items": items }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(app.db.orders().count_for_user(SHOPPER).await.unwrap(), 0);
}

#[tokio::test]
async fn test_checkout_ignores_client_price() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 500)]).await;

    let (status, body) = app
        .post(
            "/api/checkout",
            None,
            json!({
                "user_id": SHOPPER,
                "items": [{ "product_id": ids[0], "quantity": 1, "price_cents": 1 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let order_id = body["order_id"].as_i64().unwrap();
    let order = app.db.orders().get_by_id(order_id).await.unwrap().unwrap();
    assert_eq!(order.total_cents, 500);
}

#[tokio::test]
async fn test_checkout_rejects_empty_items() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/checkout", None, json!({ "user_id": SHOPPER, "items": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(app.db.orders().count_for_user(SHOPPER).await.unwrap(), 0);
}

#[tokio::test]
async fn test_checkout_unknown_product_rolls_back() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 500)]).await;

    let (status, body) = app
        .post(
            "/api/checkout",
            None,
            json!({
                "user_id": SHOPPER,
                "items": [
                    { "product_id": ids[0], "quantity": 1 },
                    { "product_id": 4040, "quantity": 1 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CHECKOUT_FAILED");
    assert_eq!(body["message"], "Failed to create order");
    assert_eq!(app.db.orders().count_for_user(SHOPPER).await.unwrap(), 0);
}

#[tokio::test]
async fn test_checkout_sequential_leaves_orphan_order() {
    let config = ApiConfig {
        checkout_mode: CheckoutMode::Sequential,
        ..ApiConfig::default()
    };
    let app = TestApp::with_config(config).await;

    let (status, _) = app
        .post(
            "/api/checkout",
            None,
            json!({ "user_id": SHOPPER, "items": [{ "product_id": 4040, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let orders = app.db.orders().list_for_user(SHOPPER).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert!(app.db.orders().lines(orders[0].id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_reject_policy() {
    let config = ApiConfig {
        unknown_product_policy: UnknownProductPolicy::Reject,
        ..ApiConfig::default()
    };
    let app = TestApp::with_config(config).await;

    let (status, body) = app
        .post(
            "/api/checkout",
            None,
            json!({ "user_id": SHOPPER, "items": [{ "product_id": 4040, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(app.db.orders().count_for_user(SHOPPER).await.unwrap(), 0);
}

#[tokio::test]
async fn test_profile_history_keeps_purchase_price() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 500)]).await;
    app.make_admin().await;

    app.post(
        "/api/checkout",
        None,
        json!({ "user_id": SHOPPER, "items": [{ "product_id": ids[0], "quantity": 3 }] }),
    )
    .await;

    let (status, _) = app
        .put(
            &format!("/api/products/{}", ids[0]),
            Some(ADMIN),
            json!({ "price_cents": 900 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/profile", Some(SHOPPER)).await;
    assert_eq!(status, StatusCode::OK);

    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["total_cents"], 1500);
    assert_eq!(history[0]["items"][0]["price_cents"], 500);
    assert_eq!(history[0]["items"][0]["quantity"], 3);
    assert_eq!(history[0]["items"][0]["product_name"], "Sencha");
}

#[tokio::test]
async fn test_update_product_errors() {
    let app = TestApp::new().await;
    let (_, ids) = app.seed(&[("Sencha", 500)]).await;
    app.make_admin().await;

    let (status, _) = app
        .put("/api/products/999", Some(ADMIN), json!({ "price_cents": 900 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(&format!("/api/products/{}", ids[0]), Some(ADMIN), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &format!("/api/products/{}", ids[0]),
            Some(SHOPPER),
            json!({ "price_cents": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_user_upsert_and_me() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/users/me", Some(SHOPPER)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .put("/api/users/me", Some(SHOPPER), json!({ "email": "ada@shop.test" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "ada");
    assert_eq!(body["role"], "customer");

    let (status, body) = app.get("/api/users/me", Some(SHOPPER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@shop.test");

    let (status, body) = app
        .put("/api/users/me", Some(SHOPPER), json!({ "email": "not-an-email" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upsert_keeps_admin_role() {
    let app = TestApp::new().await;
    app.make_admin().await;

    let (status, body) = app
        .put(
            "/api/users/me",
            Some(ADMIN),
            json!({ "email": "boss@shop.test", "name": "Boss" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["name"], "Boss");
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = TestApp::new().await;
    app.make_admin().await;

    let (status, body) = app
        .put("/api/users/me", Some(SHOPPER), json!({ "email": "admin@shop.test" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
