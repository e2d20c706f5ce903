//! Wire types for `POST /api/trade`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::position::Position;
use crate::domain::trade::TradeIntent;
use crate::shared::{Direction, Leverage};

/// Request body. Field names and formats match the backend verbatim:
/// direction as `"LONG"`/`"SHORT"`, amount and leverage as bare numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    pub direction: Direction,
    pub amount: Decimal,
    pub leverage: Leverage,
}

impl From<&TradeIntent> for TradeRequest {
    fn from(intent: &TradeIntent) -> Self {
        Self {
            direction: intent.direction(),
            amount: intent.amount(),
            leverage: intent.leverage(),
        }
    }
}

/// Response body. `trade` and `newBalance` are only present on success;
/// `error` only on an explicit rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub success: bool,
    #[serde(default)]
    pub trade: Option<Position>,
    #[serde(default)]
    pub new_balance: Option<Decimal>,
    #[serde(default)]
    pub error: Option<String>,
}
