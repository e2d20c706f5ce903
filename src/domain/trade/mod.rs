//! Trade domain — validated trade intents and the submission coordinator.

pub mod client;
pub mod wire;

use rust_decimal::Decimal;

use crate::error::TradeError;
use crate::shared::{Direction, Leverage};

/// A validated, ephemeral trade intent. Constructed fresh per submission
/// and never persisted.
///
/// Construction is the validation boundary: a non-positive amount or an
/// unsupported leverage multiplier fails here, before any request exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeIntent {
    direction: Direction,
    amount: Decimal,
    leverage: Leverage,
}

impl TradeIntent {
    pub fn new(
        direction: Direction,
        amount: Decimal,
        leverage: Leverage,
    ) -> Result<Self, TradeError> {
        if amount <= Decimal::ZERO {
            return Err(TradeError::NonPositiveAmount(amount));
        }
        Ok(Self {
            direction,
            amount,
            leverage,
        })
    }

    /// Like [`new`](Self::new), but taking the raw multiplier as users
    /// select it (`100`, `500`, ...).
    pub fn with_multiplier(
        direction: Direction,
        amount: Decimal,
        leverage: u32,
    ) -> Result<Self, TradeError> {
        Self::new(direction, amount, Leverage::try_from(leverage)?)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn leverage(&self) -> Leverage {
        self.leverage
    }
}
