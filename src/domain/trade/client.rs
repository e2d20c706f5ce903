//! Trades sub-client — submission and reconciliation.

use crate::client::SpeedrushClient;
use crate::domain::position::Position;
use crate::domain::trade::wire::{TradeRequest, TradeResponse};
use crate::domain::trade::TradeIntent;
use crate::error::{AuthError, SdkError, TradeError};

/// Sub-client coordinating trade submissions against the session state.
pub struct Trades<'a> {
    pub(crate) client: &'a SpeedrushClient,
}

impl Trades<'_> {
    /// Submit a trade intent and reconcile the authoritative response.
    ///
    /// Fails with [`AuthError::NotAuthenticated`] before any network call
    /// when the session holds no credential. On success, the created
    /// position and the new balance are applied to the session in one
    /// atomic step; on any failure (explicit rejection, non-success status,
    /// transport error, malformed fill) no state is mutated, so the caller
    /// is free to resubmit the same intent. This method never retries on
    /// its own — the endpoint is not idempotent.
    pub async fn submit(&self, intent: &TradeIntent) -> Result<Position, SdkError> {
        if !self.client.session.is_authenticated().await {
            return Err(AuthError::NotAuthenticated.into());
        }

        let request = TradeRequest::from(intent);
        let response: TradeResponse = self.client.http.submit_trade(&request).await?;

        if !response.success {
            let reason = response
                .error
                .unwrap_or_else(|| "no reason given".to_string());
            tracing::warn!(%reason, "Trade rejected");
            return Err(TradeError::Rejected { reason }.into());
        }

        let (position, new_balance) = match (response.trade, response.new_balance) {
            (Some(position), Some(balance)) => (position, balance),
            _ => return Err(TradeError::IncompleteFill.into()),
        };

        self.client
            .session
            .apply_fill(position.clone(), new_balance)
            .await;
        tracing::info!(
            id = %position.id,
            direction = %position.direction,
            leverage = %position.leverage,
            "Position opened"
        );

        Ok(position)
    }
}
