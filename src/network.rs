//! Network configuration for the SpeedRush SDK.
//!
//! One environment variable selects the REST base URL; the streaming
//! endpoint is derived from it so the two can never drift apart between
//! deployments. Both can still be overridden individually on the client
//! builder.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://speedrush-production.up.railway.app";

/// Environment variable selecting the REST base URL.
pub const API_URL_ENV: &str = "SPEEDRUSH_API_URL";

/// Resolve the REST base URL: `SPEEDRUSH_API_URL` if set and non-empty,
/// otherwise [`DEFAULT_API_URL`].
pub fn api_url_from_env() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Derive the WebSocket URL from a REST base URL.
///
/// The price feed is served from the same host as the REST API, so the WS
/// endpoint is the base URL with the scheme swapped (`https` → `wss`,
/// `http` → `ws`). A URL without a recognized scheme is assumed secure.
pub fn ws_url_for(api_url: &str) -> String {
    let api_url = api_url.trim_end_matches('/');
    if let Some(rest) = api_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = api_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        format!("wss://{api_url}")
    }
}
