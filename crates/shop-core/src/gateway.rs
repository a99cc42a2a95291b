//! # Payment Gateway Trait
//!
//! Uniform contract over the payment back-ends used at checkout.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentGateway (trait)                   │
//! │  ├── process(amount, reference)                             │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!                  │                   │
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │ PayPalGateway │   │  CardGateway  │
//!          └───────────────┘   └───────────────┘
//! ```
//!
//! Callers name a provider with a free-form key; [`PaymentProvider::from_key`]
//! resolves it once at the request boundary and [`GatewaySelector`] maps the
//! resulting enum to a registered gateway.

use crate::error::StoreResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Core trait for payment back-ends.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` against an opaque payment reference.
    ///
    /// # Returns
    /// `Ok(true)` if the charge went through, `Ok(false)` if the provider
    /// declined it, `Err` if the provider could not be reached.
    async fn process(&self, amount: Decimal, reference: &str) -> StoreResult<bool>;

    /// Display name of the provider, recorded on the order.
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Payment providers the storefront knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    PayPal,
    Card,
}

impl PaymentProvider {
    /// Resolve a caller-supplied key.
    ///
    /// `"paypal"` (any case) selects PayPal; every other key falls back to card.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "paypal" => PaymentProvider::PayPal,
            "card" | "creditcard" | "credit_card" => PaymentProvider::Card,
            other => {
                warn!("Unrecognized payment provider {:?}, falling back to card", other);
                PaymentProvider::Card
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::PayPal => "paypal",
            PaymentProvider::Card => "card",
        }
    }
}

impl Default for PaymentProvider {
    fn default() -> Self {
        PaymentProvider::Card
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway registry with a default provider
#[derive(Clone)]
pub struct GatewaySelector {
    gateways: HashMap<PaymentProvider, BoxedPaymentGateway>,
    default_provider: PaymentProvider,
}

impl GatewaySelector {
    /// Create a new selector with a default provider
    pub fn new(default_provider: PaymentProvider) -> Self {
        Self {
            gateways: HashMap::new(),
            default_provider,
        }
    }

    /// Register a gateway for a provider
    pub fn register(&mut self, provider: PaymentProvider, gateway: BoxedPaymentGateway) {
        self.gateways.insert(provider, gateway);
    }

    /// Register with builder pattern
    pub fn with_gateway(mut self, provider: PaymentProvider, gateway: BoxedPaymentGateway) -> Self {
        self.register(provider, gateway);
        self
    }

    /// Get the default gateway
    pub fn default_gateway(&self) -> Option<&BoxedPaymentGateway> {
        self.gateways.get(&self.default_provider)
    }

    /// Get a gateway by provider
    pub fn get(&self, provider: PaymentProvider) -> Option<&BoxedPaymentGateway> {
        self.gateways.get(&provider)
    }

    /// Get the gateway for `provider`, or fall back to the default
    pub fn resolve(&self, provider: PaymentProvider) -> Option<&BoxedPaymentGateway> {
        self.get(provider).or_else(|| {
            warn!(
                "No gateway registered for {}, using default {}",
                provider, self.default_provider
            );
            self.default_gateway()
        })
    }

    /// List all registered providers
    pub fn providers(&self) -> Vec<PaymentProvider> {
        let mut providers: Vec<_> = self.gateways.keys().copied().collect();
        providers.sort_by_key(|p| p.as_str());
        providers
    }

    /// Check if a provider is registered
    pub fn has_provider(&self, provider: PaymentProvider) -> bool {
        self.gateways.contains_key(&provider)
    }
}

impl Default for GatewaySelector {
    fn default() -> Self {
        Self::new(PaymentProvider::Card)
    }
}

impl fmt::Debug for GatewaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySelector")
            .field("providers", &self.providers())
            .field("default_provider", &self.default_provider)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedGateway(&'static str);

    #[async_trait]
    impl PaymentGateway for NamedGateway {
        async fn process(&self, _amount: Decimal, _reference: &str) -> StoreResult<bool> {
            Ok(true)
        }

        fn provider_name(&self) -> &'static str {
            self.0
        }
    }

    #[test]
    fn test_provider_from_key() {
        assert_eq!(PaymentProvider::from_key("paypal"), PaymentProvider::PayPal);
        assert_eq!(PaymentProvider::from_key("PayPal"), PaymentProvider::PayPal);
        assert_eq!(PaymentProvider::from_key("creditcard"), PaymentProvider::Card);
        assert_eq!(PaymentProvider::from_key("bitcoin"), PaymentProvider::Card);
    }

    #[test]
    fn test_selector_empty() {
        let selector = GatewaySelector::new(PaymentProvider::Card);

        assert!(selector.providers().is_empty());
        assert!(selector.default_gateway().is_none());
        assert!(selector.resolve(PaymentProvider::PayPal).is_none());
    }

    #[test]
    fn test_selector_falls_back_to_default() {
        let selector = GatewaySelector::default()
            .with_gateway(PaymentProvider::Card, Arc::new(NamedGateway("Credit Card")));

        let gateway = selector.resolve(PaymentProvider::PayPal).unwrap();
        assert_eq!(gateway.provider_name(), "Credit Card");
        assert!(!selector.has_provider(PaymentProvider::PayPal));
    }

    #[test]
    fn test_selector_prefers_registered_provider() {
        let selector = GatewaySelector::default()
            .with_gateway(PaymentProvider::Card, Arc::new(NamedGateway("Credit Card")))
            .with_gateway(PaymentProvider::PayPal, Arc::new(NamedGateway("PayPal")));

        let gateway = selector.resolve(PaymentProvider::PayPal).unwrap();
        assert_eq!(gateway.provider_name(), "PayPal");
        assert_eq!(
            selector.providers(),
            vec![PaymentProvider::Card, PaymentProvider::PayPal]
        );
    }
}
