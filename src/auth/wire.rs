//! Wire types for the auth endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::Profile;
use crate::shared::WalletAddress;

/// Body of `POST /api/auth/nonce`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceRequest {
    pub wallet_address: WalletAddress,
}

/// Response of `POST /api/auth/nonce`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
}

/// Body of `POST /api/auth/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub wallet_address: WalletAddress,
    pub signature: String,
}

/// Response of `POST /api/auth/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub token: String,
}

/// Response of `GET /api/auth/profile`. Unknown fields are tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub balance: Decimal,
}

impl From<ProfileResponse> for Profile {
    fn from(resp: ProfileResponse) -> Self {
        Profile {
            balance: resp.balance,
        }
    }
}
