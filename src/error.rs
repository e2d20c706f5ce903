//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("WebSocket error: {0}")]
    Ws(#[from] WsError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Trade error: {0}")]
    Trade(#[from] TradeError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors. Transport failures and non-2xx statuses both land
/// here, so callers can treat any variant as "network error" per boundary.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Authentication errors, one per handshake step plus session preconditions.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The nonce endpoint was unreachable or returned a non-success status.
    #[error("Nonce unavailable: {0}")]
    NonceUnavailable(#[source] HttpError),

    /// The wallet declined (or failed) to sign the login message.
    #[error("Signature rejected: {0}")]
    SignatureRejected(#[from] SignerError),

    /// The backend refused the signed message.
    #[error("Signature verification failed: {0}")]
    VerificationFailed(#[source] HttpError),

    /// The credential was issued but the profile fetch failed. Non-fatal:
    /// the session is authenticated and the profile can be refetched.
    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(#[source] HttpError),

    /// An operation requiring a credential was attempted without one.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The wallet reported no connected address.
    #[error("Wallet not connected")]
    WalletDisconnected,

    /// A newer login attempt started while this one was in flight; its
    /// result was discarded without touching session state.
    #[error("Login attempt superseded by a newer one")]
    Superseded,
}

/// Errors surfaced by a [`WalletSigner`](crate::auth::WalletSigner).
#[derive(Error, Debug)]
pub enum SignerError {
    #[error("signature request rejected by user")]
    Rejected,

    #[error("wallet unavailable: {0}")]
    Unavailable(String),
}

/// Trade submission errors.
#[derive(Error, Debug)]
pub enum TradeError {
    /// The backend answered with `success: false`.
    #[error("Trade rejected by backend: {reason}")]
    Rejected { reason: String },

    /// The backend flagged success but omitted the fill data. State is left
    /// untouched — a fill without both position and balance is unusable.
    #[error("Trade response missing position or new balance")]
    IncompleteFill,

    /// Leverage outside the supported multiplier set.
    #[error("Unsupported leverage: {0}x")]
    UnsupportedLeverage(u32),

    /// Trade amount must be strictly positive.
    #[error("Trade amount must be positive, got {0}")]
    NonPositiveAmount(rust_decimal::Decimal),
}

/// WebSocket errors. Only opening the feed fails with a `Result`; runtime
/// stream failures (closes, malformed frames, exhausted reconnects) are
/// reported through [`WsEvent`](crate::ws::WsEvent) and
/// [`FeedStatus`](crate::ws::FeedStatus) instead.
#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}
