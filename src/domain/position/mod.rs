//! Position domain — leveraged position records and the local ledger.

pub mod state;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::{Direction, Leverage, PositionId};

pub use state::PositionLedger;

/// A simulated leveraged position, as returned by the backend.
///
/// Every field is backend-authoritative. The client never computes or
/// mutates any of them; settlement (status flipping to `Closed`) arrives,
/// if at all, as a full replacement entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub direction: Direction,
    pub amount: Decimal,
    pub entry_price: Decimal,
    pub leverage: Leverage,
    pub status: PositionStatus,
}

/// Lifecycle of a position. Transitions only server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Active,
    Closed,
}
