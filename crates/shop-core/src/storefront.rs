//! # Storefront
//!
//! Facade over the catalog, cart, change notifier, payment gateways and
//! confirmation channel. The HTTP layer talks to nothing else.
//!
//! ## Checkout
//!
//! ```text
//! cart empty? ──yes──▶ EmptyCart
//!     │no
//!     ▼
//! price cart ──overflow──▶ AmountOverflow
//!     │
//!     ▼
//! resolve gateway ───────────────▶ gateway.process(total)
//!                                      │false        │true
//!                                      ▼             ▼
//!                               PaymentDeclined   snapshot lines ─▶ Order
//!                               (cart untouched)         │
//!                                                        ▼
//!                                          send confirmation (best effort)
//!                                                        │
//!                                                        ▼
//!                                                   clear cart
//! ```

use crate::cart::{LineItem, SharedCart, ShoppingCart};
use crate::catalog::{Catalog, CatalogEntry};
use crate::confirmation::{BoxedConfirmationSender, LoggingConfirmationSender};
use crate::discount::DiscountStrategy;
use crate::error::{StoreError, StoreResult};
use crate::gateway::{GatewaySelector, PaymentProvider};
use crate::notify::{BoxedSubscriber, ChangeNotifier, FanoutPolicy};
use crate::order::{Order, OrderDraft};
use crate::subscribers::{CartSynchronizer, InventoryTracker, StockAlert};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Priced view of the cart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_description: Option<String>,
}

impl CartView {
    fn of(cart: &ShoppingCart) -> StoreResult<Self> {
        Ok(Self {
            items: cart.items(),
            subtotal: cart.subtotal()?,
            discount: cart.discount_total()?,
            total: cart.total()?,
            discount_description: cart.discount_strategy().map(DiscountStrategy::description),
        })
    }
}

/// The storefront facade
pub struct Storefront {
    catalog: Catalog,
    cart: SharedCart,
    notifier: ChangeNotifier,
    inventory: Arc<InventoryTracker>,
    synchronizer: Arc<CartSynchronizer>,
    gateways: GatewaySelector,
    confirmations: BoxedConfirmationSender,
}

impl Storefront {
    /// Create a storefront and wire the inventory tracker and cart
    /// synchronizer into the notifier, in that order.
    pub fn new(gateways: GatewaySelector, confirmations: BoxedConfirmationSender) -> Self {
        let cart = ShoppingCart::shared();
        let inventory = Arc::new(InventoryTracker::new());
        let synchronizer = Arc::new(CartSynchronizer::new(cart.clone()));

        let mut notifier = ChangeNotifier::default();
        notifier.register(inventory.clone());
        notifier.register(synchronizer.clone());

        Self {
            catalog: Catalog::new(),
            cart,
            notifier,
            inventory,
            synchronizer,
            gateways,
            confirmations,
        }
    }

    /// Storefront with the given gateways and a log-only confirmation sender
    pub fn with_gateways(gateways: GatewaySelector) -> Self {
        Self::new(gateways, Arc::new(LoggingConfirmationSender))
    }

    /// Builder: set how subscriber failures are handled
    pub fn with_fanout_policy(mut self, policy: FanoutPolicy) -> Self {
        self.notifier.set_policy(policy);
        self
    }

    /// Register an additional catalog subscriber after the built-in ones
    pub fn subscribe(&mut self, subscriber: BoxedSubscriber) {
        self.notifier.register(subscriber);
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Load an entry into the catalog. Seeds the inventory tracker directly;
    /// no change notification is sent.
    pub fn add_product(&mut self, entry: CatalogEntry) {
        self.inventory.record(&entry);
        self.catalog.insert(entry);
    }

    pub fn product(&self, id: &str) -> Option<&CatalogEntry> {
        self.catalog.get(id)
    }

    /// All products, sorted by id
    pub fn products(&self) -> Vec<CatalogEntry> {
        self.catalog.entries().into_iter().cloned().collect()
    }

    /// Change a product's price, then notify subscribers once
    #[instrument(skip(self))]
    pub fn set_price(&mut self, product_id: &str, new_price: Decimal) -> StoreResult<()> {
        let old_price = self.catalog.set_price(product_id, new_price)?;
        let entry = self.catalog.require(product_id)?;
        self.notifier.notify_price_changed(entry, old_price, new_price)
    }

    /// Change a product's stock, then notify subscribers once
    #[instrument(skip(self))]
    pub fn set_stock(&mut self, product_id: &str, new_stock: u32) -> StoreResult<()> {
        let old_stock = self.catalog.set_stock(product_id, new_stock)?;
        let entry = self.catalog.require(product_id)?;
        self.notifier.notify_stock_changed(entry, old_stock, new_stock)
    }

    pub fn inventory(&self) -> &InventoryTracker {
        &self.inventory
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Add a product to the cart after checking catalog stock
    pub fn add_to_cart(&mut self, product_id: &str, quantity: u32) -> StoreResult<()> {
        if quantity == 0 {
            return Err(StoreError::InvalidRequest(
                "quantity must be at least 1".to_string(),
            ));
        }
        let entry = self.catalog.require(product_id)?;
        if !entry.has_stock_for(quantity) {
            return Err(StoreError::InsufficientStock {
                product_id: product_id.to_string(),
                requested: quantity,
                available: entry.stock,
            });
        }
        self.cart.lock().add_item(entry, quantity);
        Ok(())
    }

    pub fn remove_from_cart(&mut self, product_id: &str) {
        self.cart.lock().remove_item(product_id);
    }

    pub fn update_cart_quantity(&mut self, product_id: &str, quantity: u32) {
        self.cart.lock().update_quantity(product_id, quantity);
    }

    /// Replace the cart's discount strategy; `None` clears it
    pub fn apply_discount(&mut self, strategy: Option<DiscountStrategy>) {
        match &strategy {
            Some(s) => info!("Applying discount: {}", s),
            None => info!("Clearing discount"),
        }
        self.cart.lock().set_discount_strategy(strategy);
    }

    /// Price the cart; fails when a line or the discount overflows
    pub fn cart_view(&self) -> StoreResult<CartView> {
        CartView::of(&self.cart.lock())
    }

    /// Handle to the live cart
    pub fn cart(&self) -> SharedCart {
        self.cart.clone()
    }

    /// Out-of-stock alerts raised since the last call
    pub fn take_stock_alerts(&self) -> Vec<StockAlert> {
        self.synchronizer.take_alerts()
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Charge the cart total and turn the cart into an order.
    ///
    /// The cart is left untouched on every failure. After a successful
    /// payment the cart is cleared whether or not the confirmation arrives.
    #[instrument(
        skip(self, customer_contact, provider, payment_reference),
        fields(provider = %provider)
    )]
    pub async fn checkout(
        &mut self,
        customer_contact: &str,
        provider: PaymentProvider,
        payment_reference: &str,
    ) -> StoreResult<Order> {
        let draft = self.draft_order()?;

        let gateway = self.gateways.resolve(provider).cloned().ok_or_else(|| {
            StoreError::Configuration("no payment gateway registered".to_string())
        })?;

        info!(
            "Charging {} via {} for {} lines",
            draft.total_amount,
            gateway.provider_name(),
            draft.line_items.len()
        );

        let approved = gateway
            .process(draft.total_amount, payment_reference)
            .await?;
        if !approved {
            warn!("Payment declined by {}", gateway.provider_name());
            return Err(StoreError::PaymentDeclined {
                provider: gateway.provider_name().to_string(),
                amount: draft.total_amount,
            });
        }

        let order = Order::from_draft(draft, customer_contact, gateway.provider_name());
        info!("Created order {}", order.order_id());

        match self
            .confirmations
            .send_confirmation(customer_contact, &order)
            .await
        {
            Ok(()) => info!("Order confirmation sent for {}", order.order_id()),
            Err(err) => warn!(
                "Order {} created but confirmation failed: {}",
                order.order_id(),
                err
            ),
        }

        self.cart.lock().clear();
        Ok(order)
    }

    fn draft_order(&self) -> StoreResult<OrderDraft> {
        let cart = self.cart.lock();
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        Ok(OrderDraft {
            line_items: cart.items(),
            subtotal: cart.subtotal()?,
            discount: cart.discount_total()?,
            total_amount: cart.total()?,
            discount_description: cart.discount_strategy().map(DiscountStrategy::description),
        })
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("products", &self.catalog.len())
            .field("cart_lines", &self.cart.lock().len())
            .field("notifier", &self.notifier)
            .field("gateways", &self.gateways)
            .finish()
    }
}
