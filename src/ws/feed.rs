//! `PriceFeed` — the application-facing view of the price stream.
//!
//! Wraps the transport task and reduces its event stream into two pieces of
//! observable state: the latest tick and the feed status, each behind a
//! `watch` channel so consumers can either poll or await changes.

use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::WsError;
use crate::ws::{PriceTick, WsClient, WsConfig, WsEvent};

/// Observable health of the price stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Connecting or reconnecting; the last known price may be stale.
    Connecting,
    /// Connected and receiving.
    Live,
    /// Dead: shut down, or the reconnect ceiling was exhausted.
    Disconnected,
}

/// Live price feed. Holds the single streaming connection for its lifetime;
/// `shutdown()` (or drop) releases the socket.
pub struct PriceFeed {
    client: WsClient,
    tick_rx: watch::Receiver<Option<PriceTick>>,
    status_rx: watch::Receiver<FeedStatus>,
    pump: Option<JoinHandle<()>>,
}

impl PriceFeed {
    /// Open the feed and start pumping events into the observable state.
    pub fn connect(config: WsConfig) -> Result<Self, WsError> {
        let mut client = WsClient::new(config);
        let events = client.connect()?;

        let (tick_tx, tick_rx) = watch::channel(None);
        let (status_tx, status_rx) = watch::channel(FeedStatus::Connecting);
        let pump = tokio::spawn(pump_events(events, tick_tx, status_tx));

        Ok(Self {
            client,
            tick_rx,
            status_rx,
            pump: Some(pump),
        })
    }

    /// The most recent price, if any tick has arrived yet.
    pub fn current_price(&self) -> Option<Decimal> {
        self.tick_rx.borrow().as_ref().map(|t| t.price)
    }

    /// Subscribe to tick changes.
    pub fn ticks(&self) -> watch::Receiver<Option<PriceTick>> {
        self.tick_rx.clone()
    }

    /// Current feed status.
    pub fn status(&self) -> FeedStatus {
        *self.status_rx.borrow()
    }

    /// Subscribe to status changes.
    pub fn status_changes(&self) -> watch::Receiver<FeedStatus> {
        self.status_rx.clone()
    }

    /// Close the connection and stop the pump.
    pub async fn shutdown(&mut self) {
        self.client.disconnect().await;
        if let Some(pump) = self.pump.take() {
            let _ = tokio::time::timeout(std::time::Duration::from_secs(5), pump).await;
        }
    }
}

impl Drop for PriceFeed {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

/// Reduce transport events into the two watch channels. Runs until the
/// transport task closes its event channel.
async fn pump_events(
    mut events: mpsc::Receiver<WsEvent>,
    tick_tx: watch::Sender<Option<PriceTick>>,
    status_tx: watch::Sender<FeedStatus>,
) {
    while let Some(event) = events.recv().await {
        apply_event(event, &tick_tx, &status_tx);
    }
    let _ = status_tx.send(FeedStatus::Disconnected);
}

fn apply_event(
    event: WsEvent,
    tick_tx: &watch::Sender<Option<PriceTick>>,
    status_tx: &watch::Sender<FeedStatus>,
) {
    match event {
        WsEvent::Tick(tick) => {
            tracing::debug!(price = %tick.price, "Price tick");
            let _ = tick_tx.send(Some(tick));
        }
        WsEvent::Connected => {
            tracing::info!("Price feed connected");
            let _ = status_tx.send(FeedStatus::Live);
        }
        WsEvent::Disconnected { code, reason } => {
            tracing::warn!(?code, %reason, "Price feed disconnected");
            let _ = status_tx.send(FeedStatus::Connecting);
        }
        WsEvent::MaxReconnectReached => {
            tracing::error!("Price feed gave up reconnecting");
            let _ = status_tx.send(FeedStatus::Disconnected);
        }
        WsEvent::Error(e) => {
            tracing::warn!("Price feed error: {}", e);
        }
    }
}
