//! # PayPal Gateway
//!
//! Adapts the PayPal service's `send_payment` interface to [`PaymentGateway`].
//! The service takes only an amount, so the payment reference is logged and dropped.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shop_core::{PaymentGateway, StoreResult};
use tracing::{debug, info, instrument};

/// Simulated PayPal service
#[derive(Debug, Default, Clone, Copy)]
pub struct PayPalService;

impl PayPalService {
    /// Send a payment of `amount`. The simulation approves every payment.
    pub fn send_payment(&self, amount: Decimal) -> bool {
        info!("Processing PayPal payment: ${}", amount.round_dp(2));
        true
    }
}

/// PayPal payments through [`PayPalService`]
#[derive(Debug, Default, Clone)]
pub struct PayPalGateway {
    service: PayPalService,
}

impl PayPalGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    #[instrument(skip(self, reference))]
    async fn process(&self, amount: Decimal, reference: &str) -> StoreResult<bool> {
        debug!("PayPal ignores payment reference ({} chars)", reference.len());
        Ok(self.service.send_payment(amount))
    }

    fn provider_name(&self) -> &'static str {
        "PayPal"
    }
}
