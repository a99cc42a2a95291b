//! # shop-core
//!
//! Pricing and checkout engine for storefront-rs.
//!
//! This crate provides:
//! - `Catalog` and `CatalogEntry` for the in-memory product catalog
//! - `ShoppingCart` and `LineItem` with per-line `DiscountStrategy` pricing
//! - `ChangeNotifier` fanning catalog mutations out to `CatalogSubscriber`s
//! - `InventoryTracker` and `CartSynchronizer`, the built-in subscribers
//! - `PaymentGateway` and `ConfirmationSender` for checkout collaborators
//! - `Storefront`, the facade that ties it all together into `Order`s
//! - `StoreError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CatalogSeed, DiscountStrategy, GatewaySelector, PaymentProvider, Storefront};
//!
//! let mut store = Storefront::with_gateways(gateways);
//! for entry in CatalogSeed::builtin().into_entries() {
//!     store.add_product(entry);
//! }
//!
//! store.add_to_cart("P001", 2)?;
//! store.apply_discount(Some(DiscountStrategy::percentage(10.into())));
//! store.set_price("P001", 549.into())?; // cart line follows
//!
//! let order = store.checkout("buyer@example.com", PaymentProvider::Card, "4111...").await?;
//! ```

pub mod cart;
pub mod catalog;
pub mod confirmation;
pub mod discount;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod order;
pub mod storefront;
pub mod subscribers;

// Re-exports for convenience
pub use cart::{LineItem, SharedCart, ShoppingCart};
pub use catalog::{Catalog, CatalogEntry, CatalogSeed, Category, SeedProduct};
pub use confirmation::{BoxedConfirmationSender, ConfirmationSender, LoggingConfirmationSender};
pub use discount::{DiscountKind, DiscountStrategy};
pub use error::{StoreError, StoreResult};
pub use gateway::{BoxedPaymentGateway, GatewaySelector, PaymentGateway, PaymentProvider};
pub use notify::{
    dispatch_catalog_event, subscriber_failure, BoxedSubscriber, CatalogEvent, CatalogSubscriber,
    ChangeNotifier, FanoutPolicy,
};
pub use order::Order;
pub use storefront::{CartView, Storefront};
pub use subscribers::{CartSynchronizer, InventoryTracker, StockAlert};

pub use rust_decimal::Decimal;
