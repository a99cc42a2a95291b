//! # Card Gateway
//!
//! Adapts the card processor's `charge_card` interface to [`PaymentGateway`].

use async_trait::async_trait;
use rust_decimal::Decimal;
use shop_core::{PaymentGateway, StoreResult};
use tracing::{info, instrument};

/// Simulated card processor with its own calling convention
#[derive(Debug, Default, Clone, Copy)]
pub struct CardProcessor;

impl CardProcessor {
    /// Charge `amount` to `card_number`. The simulation approves every charge.
    pub fn charge_card(&self, amount: Decimal, card_number: &str) -> bool {
        info!(
            "Processing credit card payment: ${} for card ending {}",
            amount.round_dp(2),
            last_four(card_number)
        );
        true
    }
}

/// Card payments through [`CardProcessor`]
#[derive(Debug, Default, Clone)]
pub struct CardGateway {
    processor: CardProcessor,
}

impl CardGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for CardGateway {
    #[instrument(skip(self, reference))]
    async fn process(&self, amount: Decimal, reference: &str) -> StoreResult<bool> {
        Ok(self.processor.charge_card(amount, reference))
    }

    fn provider_name(&self) -> &'static str {
        "Credit Card"
    }
}

// Card details never reach the logs in full
fn last_four(card_number: &str) -> &str {
    let len = card_number.len();
    if len <= 4 || !card_number.is_char_boundary(len - 4) {
        return card_number;
    }
    &card_number[len - 4..]
}
