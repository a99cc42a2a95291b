//! # Order Confirmation
//!
//! Contract for delivering an order confirmation to the customer.
//! Delivery is best effort: checkout logs a failure and carries on.

use crate::error::StoreResult;
use crate::order::Order;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Outbound confirmation channel (mail relay, SMS, ...)
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    /// Deliver a confirmation for `order` to `contact`.
    ///
    /// Returns `StoreError::NotificationUndeliverable` when delivery fails.
    async fn send_confirmation(&self, contact: &str, order: &Order) -> StoreResult<()>;
}

/// Type alias for a shared confirmation sender
pub type BoxedConfirmationSender = Arc<dyn ConfirmationSender>;

/// Sender that only logs; used when no delivery channel is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingConfirmationSender;

#[async_trait]
impl ConfirmationSender for LoggingConfirmationSender {
    async fn send_confirmation(&self, contact: &str, order: &Order) -> StoreResult<()> {
        info!(
            "Order {} confirmed for {} ({} via {})",
            order.order_id(),
            contact,
            order.total_amount(),
            order.payment_provider()
        );
        Ok(())
    }
}
