//! # Store Error Types
//!
//! Typed error handling for the storefront engine.
//! Every fallible catalog, cart and checkout operation returns `Result<T, StoreError>`.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration errors (missing gateway, bad seed file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Negative or otherwise unusable price
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// A price, quantity or discount rate pushed an amount past the representable range
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Requested quantity exceeds what the catalog has on hand
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    /// Checkout attempted with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Payment gateway refused the charge
    #[error("Payment declined by {provider} for amount {amount}")]
    PaymentDeclined { provider: String, amount: Decimal },

    /// Payment provider failure other than a decline
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error talking to an outbound collaborator
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Discount kind string not recognized at the request boundary
    #[error("Unknown discount type: {kind}")]
    UnknownDiscountType { kind: String },

    /// Order confirmation could not be delivered
    #[error("Confirmation to {contact} undeliverable: {reason}")]
    NotificationUndeliverable { contact: String, reason: String },

    /// A catalog subscriber failed while handling a change notification
    #[error("Subscriber {subscriber} failed: {message}")]
    SubscriberFailed { subscriber: String, message: String },

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::NetworkError(_)
                | StoreError::ProviderError { .. }
                | StoreError::NotificationUndeliverable { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Configuration(_) => 500,
            StoreError::InvalidRequest(_) => 400,
            StoreError::ProductNotFound { .. } => 404,
            StoreError::InvalidPrice { .. } => 400,
            StoreError::AmountOverflow(_) => 422,
            StoreError::InsufficientStock { .. } => 409,
            StoreError::EmptyCart => 400,
            StoreError::PaymentDeclined { .. } => 402,
            StoreError::ProviderError { .. } => 502,
            StoreError::NetworkError(_) => 503,
            StoreError::UnknownDiscountType { .. } => 400,
            StoreError::NotificationUndeliverable { .. } => 502,
            StoreError::SubscriberFailed { .. } => 500,
            StoreError::Internal(_) => 500,
            StoreError::Serialization(_) => 500,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type StoreResult<T> = Result<T, StoreError>;
