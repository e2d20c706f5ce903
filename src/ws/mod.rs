//! WebSocket layer — the live price feed.
//!
//! The connection is receive-only: the server pushes JSON frames tagged by
//! `type`, and only `"price"` frames carry state this client cares about.
//! Every other tag is reserved and ignored, so new server-side message
//! types never break old clients.

pub mod feed;
pub mod native;

use rust_decimal::Decimal;
use serde::Deserialize;

pub use feed::{FeedStatus, PriceFeed};
pub use native::WsClient;

// ─── Inbound messages ────────────────────────────────────────────────────────

/// Inbound frame, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum MessageIn {
    #[serde(rename = "price")]
    Price { price: Decimal },
    /// Any tag this client does not know. Ignored, never an error.
    #[serde(other)]
    Unknown,
}

/// Most recent observed market price. Latest-only; no history retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTick {
    pub price: Decimal,
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Events emitted by the WS client to its consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    /// A new price tick.
    Tick(PriceTick),
    /// Connection established (also after a reconnect).
    Connected,
    /// Connection lost; a reconnect attempt may follow.
    Disconnected { code: Option<u16>, reason: String },
    /// Reconnection ceiling exhausted — the feed is dead until restarted.
    MaxReconnectReached,
    /// A malformed frame. The connection stays up.
    Error(String),
}

// ─── Connection state ────────────────────────────────────────────────────────

/// Coarse transport state, readable without locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closed = 2,
}

impl From<u8> for ReadyState {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::Connecting,
            1 => Self::Open,
            _ => Self::Closed,
        }
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Configuration for the WS client.
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub url: String,
    /// Reconnect with exponential backoff on abnormal closes.
    pub reconnect: bool,
    /// Base delay for the backoff schedule.
    pub base_reconnect_delay_ms: u32,
    /// Ceiling on consecutive failed reconnect attempts.
    pub max_reconnect_attempts: u32,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: crate::network::ws_url_for(crate::network::DEFAULT_API_URL),
            reconnect: true,
            base_reconnect_delay_ms: 1_000,
            max_reconnect_attempts: 10,
        }
    }
}
