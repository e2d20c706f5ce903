//! Authentication — canonical login message, credentials, wallet signer
//! abstraction, and the login/logout sub-client.
//!
//! ## Security Model
//!
//! - The bearer token lives in [`Credential`] (session state) and a private
//!   copy inside the HTTP layer for header injection. Neither is exposed
//!   through the public API — no `.token()` accessor, redacted `Debug`.
//! - The signed message is generated by [`login_message`] and must reach the
//!   wallet byte-for-byte: the backend verifies the signature against this
//!   exact text with the nonce it issued.
//! - Logout clears the session credential, the HTTP layer's token, and
//!   resets the profile to the demo default.

pub mod client;
pub mod wire;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SignerError;
use crate::shared::WalletAddress;

// ─── Login message ───────────────────────────────────────────────────────────

/// Fixed header line of the login message.
pub const LOGIN_MESSAGE_HEADER: &str = "SpeedRush Login";

/// Build the canonical login message for a nonce.
///
/// The backend recovers the signer from the signature over exactly this
/// text; any deviation (casing, whitespace, ordering) invalidates the login.
pub fn login_message(nonce: &str) -> String {
    format!("{LOGIN_MESSAGE_HEADER}\nNonce: {nonce}")
}

// ─── Credential ──────────────────────────────────────────────────────────────

/// Opaque bearer token issued by the verify endpoint.
///
/// Created on successful verification, destroyed on logout/disconnect.
/// Expiry is backend-defined and not tracked locally — an expired token
/// simply starts failing with `Unauthorized`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// Authenticated user profile. The backend may attach more fields over
/// time; only the balance is load-bearing for this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub balance: Decimal,
}

// ─── WalletSigner ────────────────────────────────────────────────────────────

/// The wallet collaborator: supplies the connected address and signs the
/// login message, typically after prompting the user.
///
/// Implementations wrap whatever wallet integration the application uses;
/// tests use an in-memory signer.
pub trait WalletSigner {
    /// The currently connected address, if any.
    fn address(&self) -> Option<WalletAddress>;

    /// Whether a wallet is connected.
    fn is_connected(&self) -> bool {
        self.address().is_some()
    }

    /// Sign `message` with the connected wallet's key. May suspend on user
    /// interaction; the user declining surfaces as [`SignerError::Rejected`].
    fn sign_message(
        &self,
        message: &str,
    ) -> impl std::future::Future<Output = Result<String, SignerError>> + Send;
}
