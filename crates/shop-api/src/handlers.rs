//! # Request Handlers
//!
//! Axum request handlers for the storefront API.
//! Request strings (discount type, payment method) are resolved into core
//! enums here; the storefront itself only sees typed values.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_core::{
    CartView, CatalogEntry, DiscountKind, DiscountStrategy, PaymentProvider, StoreError,
};
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add or update a cart line
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// `DELETE /api/cart?productId=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemQuery {
    #[serde(default)]
    pub product_id: Option<String>,
}

/// Discount request; `type` is one of `percentage`, `fixed`, `bulk`
#[derive(Debug, Deserialize)]
pub struct DiscountRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Decimal,
    #[serde(default)]
    pub threshold: Option<u32>,
}

/// Catalog update; `type` is `price` or `stock`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateRequest {
    pub product_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Decimal,
}

/// Checkout request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub email: Option<String>,
    /// Payment provider key (defaults to "creditcard")
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Opaque reference handed to the gateway
    #[serde(default)]
    pub payment_details: Option<String>,
}

/// Product listing
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<CatalogEntry>,
    pub count: usize,
}

/// Cart with any out-of-stock warnings raised since the last read
#[derive(Debug, Serialize)]
pub struct CartResponse {
    #[serde(flatten)]
    pub cart: CartView,
    pub warnings: Vec<String>,
}

/// Plain success acknowledgement
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Applied discount
#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    pub success: bool,
    pub description: String,
}

/// Successful checkout
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_id: String,
    pub total: Decimal,
    pub payment_provider: String,
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn store_error_to_response(err: StoreError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if err.is_retryable() {
        response = response.with_details("temporary failure, retry later");
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message, 400)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List all products
pub async fn list_products(State(state): State<AppState>) -> Json<ProductsResponse> {
    let products = state.store.lock().await.products();
    let count = products.len();
    Json(ProductsResponse { products, count })
}

/// Current cart contents and totals
pub async fn get_cart(State(state): State<AppState>) -> Result<Json<CartResponse>, ApiError> {
    let store = state.store.lock().await;
    let cart = store.cart_view().map_err(store_error_to_response)?;
    let warnings = store
        .take_stock_alerts()
        .iter()
        .map(|alert| alert.message())
        .collect();

    Ok(Json(CartResponse { cart, warnings }))
}

/// Add a product to the cart
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .store
        .lock()
        .await
        .add_to_cart(&request.product_id, request.quantity)
        .map_err(store_error_to_response)?;
    Ok(SuccessResponse::ok())
}

/// Set a cart line's quantity; 0 removes it
#[instrument(skip(state))]
pub async fn update_cart(
    State(state): State<AppState>,
    Json(request): Json<CartItemRequest>,
) -> Json<SuccessResponse> {
    state
        .store
        .lock()
        .await
        .update_cart_quantity(&request.product_id, request.quantity);
    SuccessResponse::ok()
}

/// Remove a cart line
#[instrument(skip(state))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Query(query): Query<RemoveItemQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let product_id = query
        .product_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| bad_request("productId is required"))?;

    state.store.lock().await.remove_from_cart(&product_id);
    Ok(SuccessResponse::ok())
}

/// Apply a discount strategy to the cart
#[instrument(skip(state))]
pub async fn apply_discount(
    State(state): State<AppState>,
    Json(request): Json<DiscountRequest>,
) -> Result<Json<DiscountResponse>, ApiError> {
    let kind: DiscountKind = request.kind.parse().map_err(store_error_to_response)?;
    let strategy = DiscountStrategy::from_parts(kind, request.value, request.threshold)
        .map_err(store_error_to_response)?;
    let description = strategy.description();

    state.store.lock().await.apply_discount(Some(strategy));
    Ok(Json(DiscountResponse {
        success: true,
        description,
    }))
}

/// Remove the cart's discount strategy
pub async fn clear_discount(State(state): State<AppState>) -> Json<SuccessResponse> {
    state.store.lock().await.apply_discount(None);
    SuccessResponse::ok()
}

/// Change a product's price or stock
#[instrument(skip(state))]
pub async fn update_product(
    State(state): State<AppState>,
    Json(request): Json<ProductUpdateRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let mut store = state.store.lock().await;

    let result = match request.kind.trim().to_lowercase().as_str() {
        "price" => store.set_price(&request.product_id, request.value),
        "stock" => {
            let stock = whole_units(request.value)
                .ok_or_else(|| bad_request("stock must be a non-negative whole number"))?;
            store.set_stock(&request.product_id, stock)
        }
        other => return Err(bad_request(format!("Unknown update type: {}", other))),
    };

    result.map_err(store_error_to_response)?;
    Ok(SuccessResponse::ok())
}

fn whole_units(value: Decimal) -> Option<u32> {
    if value.fract().is_zero() {
        value.to_u32()
    } else {
        None
    }
}

/// Pay for the cart and create an order
#[instrument(skip(state, request))]
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let email = request
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| bad_request("Email is required"))?;
    let provider =
        PaymentProvider::from_key(request.payment_method.as_deref().unwrap_or("creditcard"));
    let reference = request
        .payment_details
        .unwrap_or_else(|| "payment_details".to_string());

    let mut store = state.store.lock().await;
    let order = store
        .checkout(email.trim(), provider, &reference)
        .await
        .map_err(|err| {
            warn!("Checkout failed: {}", err);
            store_error_to_response(err)
        })?;

    info!("Checkout complete: order {}", order.order_id());

    Ok(Json(CheckoutResponse {
        success: true,
        order_id: order.order_id().to_string(),
        total: order.total_amount(),
        payment_provider: order.payment_provider().to_string(),
        message: "Order confirmed! Check your email for confirmation.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.code, 400);
        assert!(err.details.is_none());

        let err = err.with_details("More info");
        assert_eq!(err.details, Some("More info".to_string()));
    }

    #[test]
    fn test_store_error_conversion() {
        let (status, Json(body)) = store_error_to_response(StoreError::EmptyCart);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 400);

        let (status, Json(body)) =
            store_error_to_response(StoreError::NetworkError("timeout".to_string()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.details.is_some());

        let (status, Json(body)) =
            store_error_to_response(StoreError::AmountOverflow("cart subtotal".to_string()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.details.is_none());
    }

    #[test]
    fn test_whole_units() {
        assert_eq!(whole_units(Decimal::from(12)), Some(12));
        assert_eq!(whole_units(Decimal::new(25, 1)), None);
        assert_eq!(whole_units(Decimal::from(-1)), None);
    }
}
