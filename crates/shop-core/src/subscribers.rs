//! # Catalog Subscribers
//!
//! The two subscribers wired into every storefront:
//!
//! - [`InventoryTracker`] keeps a shadow stock map for reporting.
//! - [`CartSynchronizer`] mirrors price changes into the cart and raises
//!   advisory out-of-stock alerts.

use crate::cart::SharedCart;
use crate::catalog::CatalogEntry;
use crate::error::StoreResult;
use crate::notify::CatalogSubscriber;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// Shadow stock levels, updated from stock notifications
#[derive(Debug, Default)]
pub struct InventoryTracker {
    levels: Mutex<HashMap<String, u32>>,
}

impl InventoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the level for an entry loaded into the catalog
    pub fn record(&self, entry: &CatalogEntry) {
        self.levels.lock().insert(entry.id.clone(), entry.stock);
    }

    /// Last known stock for a product, 0 if never seen
    pub fn stock(&self, product_id: &str) -> u32 {
        self.levels.lock().get(product_id).copied().unwrap_or(0)
    }

    /// Copy of every tracked level
    pub fn snapshot(&self) -> HashMap<String, u32> {
        self.levels.lock().clone()
    }
}

impl CatalogSubscriber for InventoryTracker {
    fn name(&self) -> &str {
        "inventory-tracker"
    }

    fn on_price_changed(&self, entry: &CatalogEntry, old_price: Decimal, new_price: Decimal) -> StoreResult<()> {
        info!(
            "Inventory: price changed for {} from {} to {}",
            entry.name, old_price, new_price
        );
        Ok(())
    }

    fn on_stock_changed(&self, entry: &CatalogEntry, old_stock: u32, new_stock: u32) -> StoreResult<()> {
        self.levels.lock().insert(entry.id.clone(), new_stock);
        info!(
            "Inventory: stock updated for {} from {} to {}",
            entry.name, old_stock, new_stock
        );
        Ok(())
    }
}

/// Advisory raised when a product in the cart runs out of stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub product_id: String,
    pub product_name: String,
}

impl StockAlert {
    pub fn message(&self) -> String {
        format!("{} is out of stock", self.product_name)
    }
}

/// Keeps cart line prices in step with the catalog
#[derive(Debug)]
pub struct CartSynchronizer {
    cart: SharedCart,
    alerts: Mutex<Vec<StockAlert>>,
}

impl CartSynchronizer {
    /// Create a synchronizer bound to `cart`
    pub fn new(cart: SharedCart) -> Self {
        Self {
            cart,
            alerts: Mutex::new(Vec::new()),
        }
    }

    /// Drain the alerts raised since the last call
    pub fn take_alerts(&self) -> Vec<StockAlert> {
        std::mem::take(&mut *self.alerts.lock())
    }
}

impl CatalogSubscriber for CartSynchronizer {
    fn name(&self) -> &str {
        "cart-synchronizer"
    }

    fn on_price_changed(&self, entry: &CatalogEntry, old_price: Decimal, new_price: Decimal) -> StoreResult<()> {
        let mut cart = self.cart.lock();
        if cart.contains_product(&entry.id) {
            cart.update_product_price(&entry.id, new_price);
            info!(
                "Cart updated: price for {} changed from {} to {}",
                entry.name, old_price, new_price
            );
        }
        Ok(())
    }

    fn on_stock_changed(&self, entry: &CatalogEntry, _old_stock: u32, new_stock: u32) -> StoreResult<()> {
        if new_stock == 0 && self.cart.lock().contains_product(&entry.id) {
            let alert = StockAlert {
                product_id: entry.id.clone(),
                product_name: entry.name.clone(),
            };
            warn!("{}", alert.message());
            self.alerts.lock().push(alert);
        }
        Ok(())
    }
}
