//! # SpeedRush SDK
//!
//! Rust client for the SpeedRush leveraged demo-trading backend: wallet
//! challenge-response authentication, a live streaming price feed, and
//! simulated leveraged positions settled server-side.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — shared newtypes, domain models, errors, network config
//! 2. **Session** — credential, profile, and position state behind one lock
//! 3. **HTTP API** — `SpeedrushHttp` with per-endpoint retry policies
//! 4. **WebSocket** — reconnecting price feed (`tokio-tungstenite`)
//! 5. **High-Level Client** — `SpeedrushClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use speedrush_sdk::prelude::*;
//!
//! let client = SpeedrushClient::builder().build()?;
//!
//! // Authenticate with the wallet collaborator.
//! let profile = client.auth().login(&wallet).await?;
//!
//! // Watch the price feed.
//! let feed = client.price_feed()?;
//! let price = feed.current_price();
//!
//! // Open a position.
//! let intent = TradeIntent::with_multiplier(Direction::Long, 100.into(), 1000)?;
//! let position = client.trades().submit(&intent).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, sub-clients, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants and environment configuration.
pub mod network;

// ── Layer 2: Session ─────────────────────────────────────────────────────────

/// Session state: credential, profile, positions, login lifecycle.
pub mod session;

/// Authentication: login message, credentials, wallet signer, sub-client.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
pub mod http;

// ── Layer 4: WebSocket ───────────────────────────────────────────────────────

/// Price feed: messages, transport, observable state.
pub mod ws;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `SpeedrushClient` — the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Direction, Leverage, PositionId, WalletAddress};

    // Domain types
    pub use crate::domain::position::{Position, PositionLedger, PositionStatus};
    pub use crate::domain::trade::TradeIntent;

    // Session
    pub use crate::session::{demo_balance, ConnectionStatus, SessionSnapshot, SessionStore};

    // Auth
    pub use crate::auth::{login_message, Credential, Profile, WalletSigner};

    // Errors
    pub use crate::error::{AuthError, SdkError, SignerError, TradeError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, API_URL_ENV};

    // HTTP
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // WebSocket
    pub use crate::ws::{FeedStatus, MessageIn, PriceFeed, PriceTick, WsConfig, WsEvent};

    // High-level client
    pub use crate::client::{SpeedrushClient, SpeedrushClientBuilder};
}
