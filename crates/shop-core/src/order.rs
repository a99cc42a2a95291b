//! # Order Types
//!
//! Immutable record of a paid checkout.

use crate::cart::LineItem;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed, paid order
///
/// Only [`crate::Storefront::checkout`] creates orders; fields are read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    order_id: String,
    customer_contact: String,
    line_items: Vec<LineItem>,
    subtotal: Decimal,
    discount: Decimal,
    total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount_description: Option<String>,
    payment_provider: String,
    created_at: DateTime<Utc>,
}

/// Priced cart contents captured at checkout
#[derive(Debug, Clone)]
pub(crate) struct OrderDraft {
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub discount_description: Option<String>,
}

impl Order {
    pub(crate) fn from_draft(
        draft: OrderDraft,
        customer_contact: impl Into<String>,
        payment_provider: impl Into<String>,
    ) -> Self {
        Self {
            order_id: generate_order_id(),
            customer_contact: customer_contact.into(),
            line_items: draft.line_items,
            subtotal: draft.subtotal,
            discount: draft.discount,
            total_amount: draft.total_amount,
            discount_description: draft.discount_description,
            payment_provider: payment_provider.into(),
            created_at: Utc::now(),
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn customer_contact(&self) -> &str {
        &self.customer_contact
    }

    /// Line items as they were at checkout
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Amount charged
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn discount_description(&self) -> Option<&str> {
        self.discount_description.as_deref()
    }

    /// Provider name reported by the gateway that took the payment
    pub fn payment_provider(&self) -> &str {
        &self.payment_provider
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u32 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }
}

/// Short order id: the first 8 hex digits of a v4 UUID, upper-cased
fn generate_order_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id.to_uppercase()
}
