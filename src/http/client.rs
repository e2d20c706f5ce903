//! Low-level HTTP client — `SpeedrushHttp`.
//!
//! One method per API endpoint, returning wire types; conversion to domain
//! types happens at the sub-client boundary. The bearer token is held
//! privately and injected into every request while set — it is never exposed
//! through the public API.

use crate::auth::wire::{NonceRequest, NonceResponse, ProfileResponse, VerifyRequest, VerifyResponse};
use crate::domain::trade::wire::{TradeRequest, TradeResponse};
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::shared::WalletAddress;

use async_lock::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Bound on any single REST call so a stuck login or trade submission
/// resolves as [`HttpError::Timeout`] instead of hanging forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer token slot, tagged with the login generation that wrote it.
///
/// The tag closes the re-entrancy window between committing a credential to
/// the session and installing it here: a login attempt that was superseded
/// (or torn down) while suspended carries an older generation and its write
/// is refused, so it can never overwrite a newer token or undo a logout.
#[derive(Default)]
struct TokenSlot {
    token: Option<String>,
    generation: u64,
}

/// Low-level HTTP client for the SpeedRush REST API.
pub struct SpeedrushHttp {
    base_url: String,
    client: Client,
    /// Bearer token. NEVER exposed publicly.
    auth_token: Arc<RwLock<TokenSlot>>,
}

impl SpeedrushHttp {
    pub fn new(base_url: &str) -> Self {
        let builder = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(10);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build().expect("Failed to build HTTP client"),
            auth_token: Arc::new(RwLock::new(TokenSlot::default())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install (or clear, with `None`) the bearer token used for authorized
    /// endpoints. Returns `false` (writing nothing) when `generation` is
    /// older than the slot's — the caller lost to a newer login or logout.
    pub(crate) async fn set_auth_token(&self, generation: u64, token: Option<String>) -> bool {
        let mut slot = self.auth_token.write().await;
        if generation < slot.generation {
            return false;
        }
        slot.generation = generation;
        slot.token = token;
        true
    }

    // ── Auth ─────────────────────────────────────────────────────────────

    pub async fn request_nonce(&self, address: &WalletAddress) -> Result<NonceResponse, HttpError> {
        let url = format!("{}/api/auth/nonce", self.base_url);
        let body = NonceRequest {
            wallet_address: address.clone(),
        };
        self.post(&url, &body, RetryPolicy::None).await
    }

    pub async fn verify_signature(
        &self,
        address: &WalletAddress,
        signature: &str,
    ) -> Result<VerifyResponse, HttpError> {
        let url = format!("{}/api/auth/verify", self.base_url);
        let body = VerifyRequest {
            wallet_address: address.clone(),
            signature: signature.to_string(),
        };
        self.post(&url, &body, RetryPolicy::None).await
    }

    pub async fn get_profile(&self) -> Result<ProfileResponse, HttpError> {
        let url = format!("{}/api/auth/profile", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Trade ────────────────────────────────────────────────────────────

    pub async fn submit_trade(&self, request: &TradeRequest) -> Result<TradeResponse, HttpError> {
        let url = format!("{}/api/trade", self.base_url);
        self.post(&url, request, RetryPolicy::None).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str, retry: RetryPolicy) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, None::<&()>, retry)
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::POST, url, Some(body), retry)
            .await
    }

    async fn request_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match retry {
            RetryPolicy::None => {
                return self.do_request(&method, url, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, B>(&method, url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => {
                            config.retryable_statuses.contains(status)
                        }
                        HttpError::RateLimited { retry_after_ms } => {
                            if let Some(ms) = retry_after_ms {
                                futures_timer::Delay::new(Duration::from_millis(*ms)).await;
                            }
                            true
                        }
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => {
                            re.is_connect() || re.is_timeout() || re.is_request()
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(token) = self.auth_token.read().await.token.as_ref() {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e)
            }
        })?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited {
                retry_after_ms: None,
            }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl Clone for SpeedrushHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            auth_token: self.auth_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stale_generation_cannot_overwrite_token() {
        // A login that was superseded while suspended between its session
        // commit and its token install must lose to the newer attempt.
        let http = SpeedrushHttp::new("http://localhost");
        assert!(http.set_auth_token(2, Some("fresh".into())).await);
        assert!(!http.set_auth_token(1, Some("stale".into())).await);
        assert_eq!(
            http.auth_token.read().await.token.as_deref(),
            Some("fresh")
        );
    }

    #[tokio::test]
    async fn test_stale_generation_cannot_undo_logout() {
        let http = SpeedrushHttp::new("http://localhost");
        assert!(http.set_auth_token(1, Some("tok".into())).await);
        assert!(http.set_auth_token(2, None).await);
        assert!(!http.set_auth_token(1, Some("tok".into())).await);
        assert!(http.auth_token.read().await.token.is_none());
    }

    #[tokio::test]
    async fn test_same_generation_may_rewrite_its_own_token() {
        let http = SpeedrushHttp::new("http://localhost");
        assert!(http.set_auth_token(1, Some("a".into())).await);
        assert!(http.set_auth_token(1, Some("b".into())).await);
        assert_eq!(http.auth_token.read().await.token.as_deref(), Some("b"));
    }
}
