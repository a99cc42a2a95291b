//! # shop-gateways
//!
//! Outbound collaborators for storefront-rs checkout.
//!
//! This crate provides:
//!
//! 1. **Payment gateways** adapting third-party calling conventions to
//!    `shop_core::PaymentGateway`
//!    - `CardGateway` over `CardProcessor::charge_card(amount, card)`
//!    - `PayPalGateway` over `PayPalService::send_payment(amount)`
//!
//! 2. **RelayMailer**, a `shop_core::ConfirmationSender` that posts signed
//!    HTML confirmations to an HTTP mail relay configured by `MailConfig`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_core::{GatewaySelector, PaymentProvider, Storefront};
//! use shop_gateways::{default_gateways, RelayMailer};
//! use std::sync::Arc;
//!
//! let mailer = RelayMailer::from_env()?;
//! let store = Storefront::new(default_gateways(), Arc::new(mailer));
//! ```

pub mod card;
pub mod config;
pub mod mailer;
pub mod paypal;

use shop_core::{GatewaySelector, PaymentProvider};
use std::sync::Arc;

// Re-exports
pub use card::{CardGateway, CardProcessor};
pub use config::MailConfig;
pub use mailer::RelayMailer;
pub use paypal::{PayPalGateway, PayPalService};

/// Selector with card (default) and PayPal registered
pub fn default_gateways() -> GatewaySelector {
    GatewaySelector::new(PaymentProvider::Card)
        .with_gateway(PaymentProvider::Card, Arc::new(CardGateway::new()))
        .with_gateway(PaymentProvider::PayPal, Arc::new(PayPalGateway::new()))
}
