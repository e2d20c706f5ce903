//! High-level client — `SpeedrushClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client; this module keeps the builder, the
//! shared HTTP handle, and the session state the sub-clients coordinate on.

use crate::auth::client::Auth;
use crate::domain::trade::client::Trades;
use crate::error::{SdkError, WsError};
use crate::http::SpeedrushHttp;
use crate::session::SessionStore;
use crate::ws::{PriceFeed, WsConfig};

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::trade::client::Trades as TradesClient;

/// The primary entry point for the SpeedRush SDK.
///
/// Cloning is cheap and shares the session: every clone sees the same
/// credential, balance, and positions.
pub struct SpeedrushClient {
    pub(crate) http: SpeedrushHttp,
    pub(crate) ws_config: WsConfig,
    pub(crate) session: SessionStore,
}

impl SpeedrushClient {
    pub fn builder() -> SpeedrushClientBuilder {
        SpeedrushClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn trades(&self) -> Trades<'_> {
        Trades { client: self }
    }

    /// Shared session state: connection status, balance, positions.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The WS config the price feed will use.
    pub fn ws_config(&self) -> &WsConfig {
        &self.ws_config
    }

    /// Open the price feed.
    ///
    /// The feed is intentionally not embedded in the client: its connection
    /// lifetime is typically tied to a UI component's lifecycle, so the
    /// caller owns it and releases it with `shutdown()`.
    pub fn price_feed(&self) -> Result<PriceFeed, WsError> {
        PriceFeed::connect(self.ws_config.clone())
    }
}

impl Clone for SpeedrushClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            ws_config: self.ws_config.clone(),
            session: self.session.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct SpeedrushClientBuilder {
    base_url: String,
    ws_url: Option<String>,
    ws_config: WsConfig,
}

impl Default for SpeedrushClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::api_url_from_env(),
            ws_url: None,
            ws_config: WsConfig::default(),
        }
    }
}

impl SpeedrushClientBuilder {
    /// Override the REST base URL. The WS URL follows it unless overridden
    /// separately.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Override the WS URL independently of the REST base.
    pub fn ws_url(mut self, url: &str) -> Self {
        self.ws_url = Some(url.to_string());
        self
    }

    /// Tune feed reconnect behavior.
    pub fn ws_reconnect(mut self, reconnect: bool, max_attempts: u32) -> Self {
        self.ws_config.reconnect = reconnect;
        self.ws_config.max_reconnect_attempts = max_attempts;
        self
    }

    pub fn build(self) -> Result<SpeedrushClient, SdkError> {
        let ws_url = self
            .ws_url
            .unwrap_or_else(|| crate::network::ws_url_for(&self.base_url));
        Ok(SpeedrushClient {
            http: SpeedrushHttp::new(&self.base_url),
            ws_config: WsConfig {
                url: ws_url,
                ..self.ws_config
            },
            session: SessionStore::new(),
        })
    }
}
