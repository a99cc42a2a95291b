//! # Change Notifier
//!
//! Ordered fan-out of catalog mutations to registered subscribers.
//!
//! Every notification runs synchronously on the caller's thread and visits
//! subscribers in registration order, so a subscriber sees the side effects of
//! every subscriber registered before it. Registering the same subscriber twice
//! delivers each notification to it twice.

use crate::catalog::CatalogEntry;
use crate::error::{StoreError, StoreResult};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// A catalog mutation, as seen by subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    PriceChanged {
        entry: CatalogEntry,
        old_price: Decimal,
        new_price: Decimal,
    },
    StockChanged {
        entry: CatalogEntry,
        old_stock: u32,
        new_stock: u32,
    },
}

impl CatalogEvent {
    pub fn product_id(&self) -> &str {
        match self {
            CatalogEvent::PriceChanged { entry, .. } | CatalogEvent::StockChanged { entry, .. } => {
                &entry.id
            }
        }
    }
}

/// Subscriber to catalog mutations
///
/// Implement the hooks you care about; the defaults only log.
#[allow(unused_variables)]
pub trait CatalogSubscriber: Send + Sync {
    /// Name used in logs and failure reports
    fn name(&self) -> &str;

    /// Called after an entry's base price changed
    fn on_price_changed(
        &self,
        entry: &CatalogEntry,
        old_price: Decimal,
        new_price: Decimal,
    ) -> StoreResult<()> {
        debug!(
            "{}: price of {} changed {} -> {}",
            self.name(),
            entry.id,
            old_price,
            new_price
        );
        Ok(())
    }

    /// Called after an entry's stock changed
    fn on_stock_changed(&self, entry: &CatalogEntry, old_stock: u32, new_stock: u32) -> StoreResult<()> {
        debug!(
            "{}: stock of {} changed {} -> {}",
            self.name(),
            entry.id,
            old_stock,
            new_stock
        );
        Ok(())
    }
}

/// Shared subscriber reference
pub type BoxedSubscriber = Arc<dyn CatalogSubscriber>;

/// Dispatch an event to the matching subscriber hook
pub fn dispatch_catalog_event(subscriber: &dyn CatalogSubscriber, event: &CatalogEvent) -> StoreResult<()> {
    match event {
        CatalogEvent::PriceChanged {
            entry,
            old_price,
            new_price,
        } => subscriber.on_price_changed(entry, *old_price, *new_price),
        CatalogEvent::StockChanged {
            entry,
            old_stock,
            new_stock,
        } => subscriber.on_stock_changed(entry, *old_stock, *new_stock),
    }
}

/// What a notification pass does when a subscriber fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanoutPolicy {
    /// Stop at the first failure and return it; later subscribers are skipped.
    #[default]
    Propagate,
    /// Log each failure, keep notifying, then return the first failure.
    Isolate,
}

/// Ordered publisher of catalog mutations
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    subscribers: Vec<BoxedSubscriber>,
    policy: FanoutPolicy,
}

impl ChangeNotifier {
    pub fn new(policy: FanoutPolicy) -> Self {
        Self {
            subscribers: Vec::new(),
            policy,
        }
    }

    /// Append a subscriber. Duplicates are not filtered.
    pub fn register(&mut self, subscriber: BoxedSubscriber) {
        debug!("Registered catalog subscriber {}", subscriber.name());
        self.subscribers.push(subscriber);
    }

    pub fn policy(&self) -> FanoutPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: FanoutPolicy) {
        self.policy = policy;
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn notify_price_changed(
        &self,
        entry: &CatalogEntry,
        old_price: Decimal,
        new_price: Decimal,
    ) -> StoreResult<()> {
        self.publish(&CatalogEvent::PriceChanged {
            entry: entry.clone(),
            old_price,
            new_price,
        })
    }

    pub fn notify_stock_changed(&self, entry: &CatalogEntry, old_stock: u32, new_stock: u32) -> StoreResult<()> {
        self.publish(&CatalogEvent::StockChanged {
            entry: entry.clone(),
            old_stock,
            new_stock,
        })
    }

    /// Deliver one event to every subscriber in registration order
    pub fn publish(&self, event: &CatalogEvent) -> StoreResult<()> {
        let mut first_failure = None;

        for subscriber in &self.subscribers {
            if let Err(err) = dispatch_catalog_event(subscriber.as_ref(), event) {
                match self.policy {
                    FanoutPolicy::Propagate => return Err(err),
                    FanoutPolicy::Isolate => {
                        error!(
                            "Subscriber {} failed on {}: {}",
                            subscriber.name(),
                            event.product_id(),
                            err
                        );
                        first_failure.get_or_insert(err);
                    }
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.subscribers.iter().map(|s| s.name().to_string()).collect();
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &names)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Build a `SubscriberFailed` error for `subscriber`
pub fn subscriber_failure(subscriber: &dyn CatalogSubscriber, message: impl Into<String>) -> StoreError {
    StoreError::SubscriberFailed {
        subscriber: subscriber.name().to_string(),
        message: message.into(),
    }
}
