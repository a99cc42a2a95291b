//! # Discount Strategies
//!
//! Pure per-line pricing adjustments for the shopping cart.
//!
//! Each variant is a function `(unit_price, quantity) -> discount`. The cart
//! applies the active strategy to every line independently and sums the results.
//! The request boundary turns the browser's `type` string into a
//! [`DiscountKind`] once; the core only ever matches on the enum.

use crate::error::{StoreError, StoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A discount strategy applied per cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountStrategy {
    /// `rate` percent off every line. Negative rates act as a surcharge.
    Percentage { rate: Decimal },

    /// Flat `amount` off every unit, regardless of unit price.
    FixedPerUnit { amount: Decimal },

    /// `rate` percent off a line once its quantity reaches `min_quantity`.
    BulkThreshold { min_quantity: u32, rate: Decimal },
}

impl DiscountStrategy {
    pub fn percentage(rate: Decimal) -> Self {
        DiscountStrategy::Percentage { rate }
    }

    pub fn fixed_per_unit(amount: Decimal) -> Self {
        DiscountStrategy::FixedPerUnit { amount }
    }

    pub fn bulk_threshold(min_quantity: u32, rate: Decimal) -> Self {
        DiscountStrategy::BulkThreshold { min_quantity, rate }
    }

    /// Build a strategy from request parts.
    ///
    /// `value` is the rate for percentage and bulk discounts and the per-unit
    /// amount for fixed discounts. Bulk discounts require a `threshold`.
    pub fn from_parts(kind: DiscountKind, value: Decimal, threshold: Option<u32>) -> StoreResult<Self> {
        match kind {
            DiscountKind::Percentage => Ok(Self::percentage(value)),
            DiscountKind::Fixed => Ok(Self::fixed_per_unit(value)),
            DiscountKind::Bulk => {
                let min_quantity = threshold.ok_or_else(|| {
                    StoreError::InvalidRequest("bulk discount requires a threshold".to_string())
                })?;
                Ok(Self::bulk_threshold(min_quantity, value))
            }
        }
    }

    /// Discount for one line of `quantity` units at `unit_price`.
    ///
    /// Fails with [`StoreError::AmountOverflow`] when the result leaves the
    /// `Decimal` range.
    pub fn discount(&self, unit_price: Decimal, quantity: u32) -> StoreResult<Decimal> {
        let quantity = Decimal::from(quantity);
        match *self {
            DiscountStrategy::Percentage { rate } => percent_of_line(unit_price, quantity, rate),
            DiscountStrategy::FixedPerUnit { amount } => amount.checked_mul(quantity).ok_or_else(|| {
                StoreError::AmountOverflow(format!("{} off per unit x {}", amount, quantity))
            }),
            DiscountStrategy::BulkThreshold { min_quantity, rate } => {
                if quantity >= Decimal::from(min_quantity) {
                    percent_of_line(unit_price, quantity, rate)
                } else {
                    Ok(Decimal::ZERO)
                }
            }
        }
    }

    /// Human-readable description echoed back to the caller
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DiscountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountStrategy::Percentage { rate } => write!(f, "{}% off", rate.normalize()),
            DiscountStrategy::FixedPerUnit { amount } => {
                write!(f, "${} off per item", amount.normalize())
            }
            DiscountStrategy::BulkThreshold { min_quantity, rate } => write!(
                f,
                "{}% off when buying {} or more",
                rate.normalize(),
                min_quantity
            ),
        }
    }
}

fn percent_of_line(unit_price: Decimal, quantity: Decimal, rate: Decimal) -> StoreResult<Decimal> {
    unit_price
        .checked_mul(quantity)
        .and_then(|line| line.checked_mul(rate))
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| {
            StoreError::AmountOverflow(format!("{}% of {} x {}", rate, unit_price, quantity))
        })
}

/// Discount kind as named by API callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    Percentage,
    Fixed,
    Bulk,
}

impl FromStr for DiscountKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percentage" => Ok(DiscountKind::Percentage),
            "fixed" => Ok(DiscountKind::Fixed),
            "bulk" => Ok(DiscountKind::Bulk),
            other => Err(StoreError::UnknownDiscountType {
                kind: other.to_string(),
            }),
        }
    }
}
