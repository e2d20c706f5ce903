//! WebSocket transport — `tokio-tungstenite`.
//!
//! A background tokio task owns the socket for its whole lifetime:
//! - receive-only frame handling (this feed has no outbound protocol)
//! - exponential backoff reconnection with jitter, up to a ceiling
//! - event delivery to the consumer over an mpsc channel

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::WsError;
use crate::ws::{MessageIn, PriceTick, ReadyState, WsConfig, WsEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Disconnect,
}

// ─── Disconnect reasons for the reconnection decision ────────────────────────

enum DisconnectReason {
    UserRequested,
    ServerClosed { code: u16, reason: String },
    Error(String),
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    config: WsConfig,
    event_tx: mpsc::Sender<WsEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    reconnect_attempts: u32,
    ready_state: Arc<AtomicU8>,
}

impl TaskState {
    fn emit(&self, event: WsEvent) {
        let _ = self.event_tx.try_send(event);
    }

    fn should_reconnect(&self) -> bool {
        self.config.reconnect && self.reconnect_attempts < self.config.max_reconnect_attempts
    }
}

// ─── Public WsClient ─────────────────────────────────────────────────────────

/// Transport handle for the price feed connection.
///
/// `connect()` spawns the background task and hands back the event
/// receiver; `disconnect()` closes the socket gracefully. Dropping the
/// handle aborts the task, so the socket can never outlive its owner.
pub struct WsClient {
    config: WsConfig,
    cmd_tx: Option<mpsc::Sender<Command>>,
    task_handle: Option<JoinHandle<()>>,
    ready_state: Arc<AtomicU8>,
}

impl WsClient {
    /// Create a new WS client. Does not connect yet.
    pub fn new(config: WsConfig) -> Self {
        Self {
            config,
            cmd_tx: None,
            task_handle: None,
            ready_state: Arc::new(AtomicU8::new(ReadyState::Closed as u8)),
        }
    }

    /// Spawn the connection task and return the event stream.
    ///
    /// Calling this twice without a `disconnect()` in between fails with
    /// [`WsError::ConnectionFailed`] — one handle, one socket.
    pub fn connect(&mut self) -> Result<mpsc::Receiver<WsEvent>, WsError> {
        if self.cmd_tx.is_some() {
            return Err(WsError::ConnectionFailed("already connected".into()));
        }

        let (event_tx, event_rx) = mpsc::channel(256);
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        self.cmd_tx = Some(cmd_tx);
        self.ready_state
            .store(ReadyState::Connecting as u8, Ordering::SeqCst);

        let state = TaskState {
            config: self.config.clone(),
            event_tx,
            cmd_rx,
            reconnect_attempts: 0,
            ready_state: Arc::clone(&self.ready_state),
        };

        self.task_handle = Some(tokio::spawn(run_task(state)));
        Ok(event_rx)
    }

    /// Close the connection and wait for the background task to finish.
    pub async fn disconnect(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Disconnect).await;
        }

        if let Some(handle) = self.task_handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }

        self.ready_state
            .store(ReadyState::Closed as u8, Ordering::SeqCst);
    }

    /// Whether the socket is currently open.
    pub fn is_connected(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// Current transport state.
    pub fn ready_state(&self) -> ReadyState {
        ReadyState::from(self.ready_state.load(Ordering::SeqCst))
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    loop {
        // ── 1. Attempt connection ────────────────────────────────────────
        let stream = match attempt_connect(&state.config.url).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("WebSocket connection failed: {}", e);
                state.emit(WsEvent::Disconnected {
                    code: None,
                    reason: e.clone(),
                });

                if state.should_reconnect() {
                    backoff_sleep(&mut state).await;
                    continue;
                }
                state.emit(WsEvent::MaxReconnectReached);
                state
                    .ready_state
                    .store(ReadyState::Closed as u8, Ordering::SeqCst);
                return;
            }
        };

        // ── 2. Connected ─────────────────────────────────────────────────
        state.reconnect_attempts = 0;
        state
            .ready_state
            .store(ReadyState::Open as u8, Ordering::SeqCst);
        state.emit(WsEvent::Connected);

        // ── 3. Inner receive loop ────────────────────────────────────────
        let reason = run_connected(&mut state, stream).await;

        // ── 4. Post-disconnect decision ──────────────────────────────────
        match reason {
            DisconnectReason::UserRequested => {
                state
                    .ready_state
                    .store(ReadyState::Closed as u8, Ordering::SeqCst);
                return;
            }
            DisconnectReason::ServerClosed { .. } | DisconnectReason::Error(_) => {
                if state.should_reconnect() {
                    state
                        .ready_state
                        .store(ReadyState::Connecting as u8, Ordering::SeqCst);
                    backoff_sleep(&mut state).await;
                    continue;
                }
                state.emit(WsEvent::MaxReconnectReached);
                state
                    .ready_state
                    .store(ReadyState::Closed as u8, Ordering::SeqCst);
                return;
            }
        }
    }
}

/// The inner connected loop — runs until the connection breaks.
async fn run_connected(state: &mut TaskState, stream: WsStream) -> DisconnectReason {
    let (mut sink, mut stream) = stream.split();

    loop {
        tokio::select! {
            // ── a) Incoming WS message ───────────────────────────────────
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let text: &str = text.as_ref();
                        match parse_frame(text) {
                            Ok(Some(tick)) => state.emit(WsEvent::Tick(tick)),
                            Ok(None) => {
                                tracing::trace!("Ignoring non-price frame");
                            }
                            Err(e) => {
                                tracing::warn!(
                                    "WS deserialization error: {} — raw: {}",
                                    e,
                                    text
                                );
                                state.emit(WsEvent::Error(format!(
                                    "Deserialization error: {}",
                                    e
                                )));
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = extract_close(frame.as_ref());
                        state.emit(WsEvent::Disconnected {
                            code: Some(code),
                            reason: reason.clone(),
                        });
                        return DisconnectReason::ServerClosed { code, reason };
                    }
                    Some(Ok(_)) => {} // Pong, Binary, Frame — ignore
                    Some(Err(e)) => {
                        let reason = e.to_string();
                        tracing::error!("WebSocket error: {}", reason);
                        state.emit(WsEvent::Disconnected {
                            code: None,
                            reason: reason.clone(),
                        });
                        return DisconnectReason::Error(reason);
                    }
                    None => {
                        state.emit(WsEvent::Disconnected {
                            code: None,
                            reason: "Stream ended".into(),
                        });
                        return DisconnectReason::Error("Stream ended".into());
                    }
                }
            }

            // ── b) Command from public API ───────────────────────────────
            cmd = state.cmd_rx.recv() => {
                match cmd {
                    Some(Command::Disconnect) | None => {
                        // None means the WsClient handle was dropped.
                        let _ = sink.send(Message::Close(Some(CloseFrame {
                            code: CloseCode::Normal,
                            reason: "Client disconnect".into(),
                        }))).await;
                        return DisconnectReason::UserRequested;
                    }
                }
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn attempt_connect(url: &str) -> Result<WsStream, String> {
    let (ws_stream, _) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(url))
        .await
        .map_err(|_| "Connection timeout".to_string())?
        .map_err(|e| e.to_string())?;
    Ok(ws_stream)
}

/// Parse one text frame. `Ok(None)` is a frame this client ignores.
fn parse_frame(text: &str) -> Result<Option<PriceTick>, serde_json::Error> {
    match serde_json::from_str::<MessageIn>(text)? {
        MessageIn::Price { price } => Ok(Some(PriceTick { price })),
        MessageIn::Unknown => Ok(None),
    }
}

/// Extract close code and reason from an optional CloseFrame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.to_string()),
        None => (1006, "No close frame".into()),
    }
}

async fn backoff_sleep(state: &mut TaskState) {
    state.reconnect_attempts += 1;

    let exp = (state.reconnect_attempts - 1).min(10);
    let base = state
        .config
        .base_reconnect_delay_ms
        .saturating_mul(1u32 << exp);
    let jitter = rand::random::<u32>() % 500;
    let delay = base.saturating_add(jitter).min(60_000);

    tracing::info!(
        "Reconnect attempt {}/{} in {}ms",
        state.reconnect_attempts,
        state.config.max_reconnect_attempts,
        delay
    );

    tokio::time::sleep(Duration::from_millis(delay as u64)).await;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
