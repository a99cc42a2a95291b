//! # Shopping Cart
//!
//! Line items and pricing for the single storefront cart.
//!
//! A line keeps its own `current_price` snapshot instead of reading the catalog,
//! so totals only move when a price change is explicitly synchronized into the
//! cart (see [`crate::subscribers::CartSynchronizer`]).

use crate::catalog::CatalogEntry;
use crate::discount::DiscountStrategy;
use crate::error::{StoreError, StoreResult};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A line item in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog id of the product
    pub product_id: String,

    /// Product name (denormalized for display)
    pub product_name: String,

    /// Quantity, always at least 1
    pub quantity: u32,

    /// Cart-local unit price
    pub current_price: Decimal,
}

impl LineItem {
    /// Create a line item from a catalog entry, capturing its current price
    pub fn from_entry(entry: &CatalogEntry, quantity: u32) -> Self {
        Self {
            product_id: entry.id.clone(),
            product_name: entry.name.clone(),
            quantity,
            current_price: entry.base_price,
        }
    }

    /// `current_price * quantity`
    pub fn subtotal(&self) -> StoreResult<Decimal> {
        self.current_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| {
                StoreError::AmountOverflow(format!(
                    "{} x {} for {}",
                    self.current_price, self.quantity, self.product_id
                ))
            })
    }
}

/// The shopping cart
#[derive(Debug, Clone, Default)]
pub struct ShoppingCart {
    items: Vec<LineItem>,
    discount: Option<DiscountStrategy>,
}

/// Cart shared between the storefront and the cart synchronizer
pub type SharedCart = Arc<Mutex<ShoppingCart>>;

impl ShoppingCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a new, empty cart for sharing
    pub fn shared() -> SharedCart {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Add `quantity` units of a product.
    ///
    /// Merges into an existing line for the same product; otherwise creates a
    /// line priced at the entry's current base price. Stock is not checked here.
    pub fn add_item(&mut self, entry: &CatalogEntry, quantity: u32) {
        if quantity == 0 {
            debug!("Ignoring zero-quantity add for {}", entry.id);
            return;
        }
        match self.line_mut(&entry.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(LineItem::from_entry(entry, quantity)),
        }
    }

    /// Remove the line for a product, if any
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// Set the quantity of an existing line. Never creates a line; zero removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    /// Set the cart-local price of an existing line
    pub fn update_product_price(&mut self, product_id: &str, new_price: Decimal) {
        if let Some(line) = self.line_mut(product_id) {
            line.current_price = new_price;
        }
    }

    pub fn contains_product(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// Replace the active discount strategy; `None` clears it
    pub fn set_discount_strategy(&mut self, strategy: Option<DiscountStrategy>) {
        self.discount = strategy;
    }

    pub fn discount_strategy(&self) -> Option<&DiscountStrategy> {
        self.discount.as_ref()
    }

    /// Sum of `current_price * quantity` over all lines
    pub fn subtotal(&self) -> StoreResult<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |sum, item| {
            checked_sum(sum, item.subtotal()?, "cart subtotal")
        })
    }

    /// Sum of the per-line discounts, or zero without a strategy
    pub fn discount_total(&self) -> StoreResult<Decimal> {
        let Some(strategy) = &self.discount else {
            return Ok(Decimal::ZERO);
        };
        self.items.iter().try_fold(Decimal::ZERO, |sum, item| {
            let line = strategy.discount(item.current_price, item.quantity)?;
            checked_sum(sum, line, "cart discount")
        })
    }

    /// `subtotal - discount_total`. Not clamped: an oversized discount goes negative.
    pub fn total(&self) -> StoreResult<Decimal> {
        let (subtotal, discount) = (self.subtotal()?, self.discount_total()?);
        subtotal.checked_sub(discount).ok_or_else(|| {
            StoreError::AmountOverflow(format!("{} less discount {}", subtotal, discount))
        })
    }

    /// Snapshot of the current lines
    pub fn items(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Remove every line. The discount strategy is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }
}

fn checked_sum(sum: Decimal, amount: Decimal, what: &str) -> StoreResult<Decimal> {
    sum.checked_add(amount)
        .ok_or_else(|| StoreError::AmountOverflow(format!("{} exceeds {}", what, Decimal::MAX)))
}
