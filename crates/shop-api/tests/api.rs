use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shop_api::{create_router, AppConfig, AppState};
use shop_core::{
    CatalogSeed, Decimal, GatewaySelector, PaymentGateway, PaymentProvider, StoreResult, Storefront,
};
use shop_gateways::default_gateways;
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        static_dir: None,
        catalog_path: None,
    }
}

fn seeded(gateways: GatewaySelector) -> AppState {
    let mut store = Storefront::with_gateways(gateways);
    for entry in CatalogSeed::builtin().into_entries() {
        store.add_product(entry);
    }
    AppState::with_store(store, test_config())
}

fn app() -> (Router, AppState) {
    let state = seeded(default_gateways());
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn dec(value: &Value) -> Decimal {
    value.to_string().parse().unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_products() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api/products", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(body["products"][0]["id"], "P001");
    assert_eq!(body["products"][0]["attributes"]["warranty"], "1 year");
    assert_eq!(dec(&body["products"][0]["basePrice"]), Decimal::new(59999, 2));
}

#[tokio::test]
async fn test_cart_lifecycle() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P002", "quantity": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    send(
        &app,
        Method::PUT,
        "/api/cart",
        Some(json!({"productId": "P002", "quantity": 4})),
    )
    .await;

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(cart["items"][0]["quantity"], 4);
    assert_eq!(dec(&cart["subtotal"]), Decimal::new(11996, 2));
    assert_eq!(cart["warnings"], json!([]));

    let (status, _) = send(&app, Method::DELETE, "/api/cart?productId=P002", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
async fn test_cart_errors_map_to_status_codes() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "NOPE", "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P004", "quantity": 26})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, "/api/cart", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_discount_apply_and_clear() {
    let (app, _) = app();
    send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P002", "quantity": 4})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/discount",
        Some(json!({"type": "bulk", "value": 10, "threshold": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "10% off when buying 3 or more");

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(dec(&cart["discount"]), Decimal::new(11996, 3));
    assert_eq!(cart["discountDescription"], "10% off when buying 3 or more");

    let (status, _) = send(&app, Method::DELETE, "/api/discount", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(dec(&cart["discount"]), Decimal::ZERO);
    assert!(cart.get("discountDescription").is_none());
}

#[tokio::test]
async fn test_unknown_discount_type_is_bad_request() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/discount",
        Some(json!({"type": "bogo", "value": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("bogo"));
}

#[tokio::test]
async fn test_price_update_propagates_to_cart() {
    let (app, _) = app();
    send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P001", "quantity": 1})),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/update",
        Some(json!({"productId": "P001", "type": "price", "value": 499})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(dec(&cart["items"][0]["currentPrice"]), Decimal::from(499));
    assert_eq!(dec(&cart["total"]), Decimal::from(499));
}

#[tokio::test]
async fn test_oversized_discount_is_rejected_without_losing_cart() {
    let (app, _) = app();
    send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P001", "quantity": 1})),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/discount",
        Some(json!({"type": "percentage", "value": 1e27})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({"email": "buyer@example.com"})),
    )
    .await;
    assert!(status.is_client_error());

    send(&app, Method::DELETE, "/api/discount", None).await;
    let (status, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["productId"], "P001");
    assert_eq!(dec(&cart["total"]), Decimal::new(59999, 2));
}

#[tokio::test]
async fn test_oversized_price_update_is_client_error() {
    let (app, _) = app();
    send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P002", "quantity": 100})),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/update",
        Some(json!({"productId": "P002", "type": "price", "value": 1e27})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/cart", None).await;
    assert!(status.is_client_error());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({"email": "buyer@example.com"})),
    )
    .await;
    assert!(status.is_client_error());

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_stock_update_raises_warning_once() {
    let (app, state) = app();
    send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P003", "quantity": 1})),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/update",
        Some(json!({"productId": "P003", "type": "stock", "value": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.store.lock().await.inventory().stock("P003"), 0);

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(cart["warnings"], json!(["Rust Design Patterns is out of stock"]));
    assert_eq!(cart["items"][0]["productId"], "P003");

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(cart["warnings"], json!([]));
}

#[tokio::test]
async fn test_invalid_updates_are_rejected() {
    let (app, _) = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/update",
        Some(json!({"productId": "P001", "type": "price", "value": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/update",
        Some(json!({"productId": "P001", "type": "stock", "value": 2.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/update",
        Some(json!({"productId": "P001", "type": "color", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_success_clears_cart() {
    let (app, _) = app();
    send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P002", "quantity": 1})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({"email": "buyer@example.com", "paymentMethod": "paypal"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["paymentProvider"], "PayPal");
    assert_eq!(body["orderId"].as_str().unwrap().len(), 8);
    assert_eq!(
        body["message"],
        "Order confirmed! Check your email for confirmation."
    );

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
async fn test_checkout_defaults_to_card() {
    let (app, _) = app();
    send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P002", "quantity": 1})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({"email": "buyer@example.com", "paymentMethod": "bitcoin"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paymentProvider"], "Credit Card");
}

#[tokio::test]
async fn test_checkout_validation() {
    let (app, _) = app();

    let (status, _) = send(&app, Method::POST, "/api/checkout", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({"email": "buyer@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");
}

struct DecliningGateway;

#[async_trait]
impl PaymentGateway for DecliningGateway {
    async fn process(&self, _amount: Decimal, _reference: &str) -> StoreResult<bool> {
        Ok(false)
    }

    fn provider_name(&self) -> &'static str {
        "Credit Card"
    }
}

#[tokio::test]
async fn test_declined_payment_keeps_cart() {
    let gateways =
        GatewaySelector::default().with_gateway(PaymentProvider::Card, Arc::new(DecliningGateway));
    let state = seeded(gateways);
    let app = create_router(state);
    send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({"productId": "P002", "quantity": 1})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({"email": "buyer@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], 402);

    let (_, cart) = send(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(cart["items"][0]["productId"], "P002");
}
