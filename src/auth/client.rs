//! Auth sub-client — the nonce → sign → verify → profile handshake.

use crate::auth::{login_message, Credential, Profile, WalletSigner};
use crate::client::SpeedrushClient;
use crate::error::{AuthError, SdkError};
use crate::shared::WalletAddress;

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a SpeedrushClient,
}

impl Auth<'_> {
    /// Run the full login handshake for the wallet's connected address.
    ///
    /// Steps: request a single-use nonce, have the wallet sign the canonical
    /// login message, submit the signature for verification, then fetch the
    /// profile under the fresh credential. On success the session holds
    /// exactly one credential and one profile.
    ///
    /// Re-entrancy: each call claims a login generation. If a newer attempt
    /// starts while this one is suspended (nonce round-trip, wallet prompt),
    /// this attempt's result is refused at commit time and surfaces as
    /// [`AuthError::Superseded`] — stale data can never overwrite the state
    /// of the most recently initiated attempt.
    ///
    /// The profile fetch failing is non-fatal: the credential stays
    /// committed, the session keeps the demo profile, and the error is
    /// surfaced as [`AuthError::ProfileFetchFailed`] so the caller can
    /// [`refresh_profile`](Self::refresh_profile) later.
    pub async fn login<S: WalletSigner>(&self, signer: &S) -> Result<Profile, SdkError> {
        let address = signer.address().ok_or(AuthError::WalletDisconnected)?;
        let generation = self.client.session.begin_login().await;

        let token = match self.handshake(&address, signer).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(%address, "Login failed: {}", e);
                self.client.session.fail_login(generation).await;
                return Err(e.into());
            }
        };

        if !self
            .client
            .session
            .complete_login(generation, Credential::new(token.clone()))
            .await
        {
            return Err(AuthError::Superseded.into());
        }
        // The token install carries the same generation as the session
        // commit, so an attempt suspended between the two cannot clobber a
        // newer attempt's token (or undo a logout) when it resumes.
        if !self
            .client
            .http
            .set_auth_token(generation, Some(token))
            .await
        {
            return Err(AuthError::Superseded.into());
        }
        tracing::info!(%address, "Login verified");

        match self.client.http.get_profile().await {
            Ok(resp) => {
                let profile = Profile::from(resp);
                if !self.client.session.set_profile(generation, profile.clone()).await {
                    return Err(AuthError::Superseded.into());
                }
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!("Profile fetch failed after verified login: {}", e);
                Err(AuthError::ProfileFetchFailed(e).into())
            }
        }
    }

    /// Steps 1–4: nonce, canonical message, wallet signature, verification.
    /// Produces the bearer token without touching session state.
    async fn handshake<S: WalletSigner>(
        &self,
        address: &WalletAddress,
        signer: &S,
    ) -> Result<String, AuthError> {
        let nonce = self
            .client
            .http
            .request_nonce(address)
            .await
            .map_err(AuthError::NonceUnavailable)?
            .nonce;

        let message = login_message(&nonce);
        let signature = signer.sign_message(&message).await?;

        let verified = self
            .client
            .http
            .verify_signature(address, &signature)
            .await
            .map_err(AuthError::VerificationFailed)?;

        Ok(verified.token)
    }

    /// Refetch the profile under the current credential.
    pub async fn refresh_profile(&self) -> Result<Profile, SdkError> {
        if !self.client.session.is_authenticated().await {
            return Err(AuthError::NotAuthenticated.into());
        }
        let resp = self
            .client
            .http
            .get_profile()
            .await
            .map_err(AuthError::ProfileFetchFailed)?;
        let profile = Profile::from(resp);
        self.client.session.update_profile(profile.clone()).await;
        Ok(profile)
    }

    /// Tear the session down: clear the bearer token and reset the profile
    /// to the demo default. Call on wallet disconnect.
    ///
    /// Teardown claims a fresh login generation, invalidating any login
    /// attempt still in flight; the token clear is tagged with it so such
    /// an attempt cannot re-install its token afterwards.
    pub async fn logout(&self) {
        let generation = self.client.session.teardown().await;
        self.client.http.set_auth_token(generation, None).await;
        tracing::info!("Session torn down");
    }

    /// Whether the session currently holds a credential.
    pub async fn is_authenticated(&self) -> bool {
        self.client.session.is_authenticated().await
    }
}
