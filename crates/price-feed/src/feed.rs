//! Price feed connection lifecycle.

use crate::parser::{parse_message, ParsedMessage};
use futures_util::{SinkExt, StreamExt};
use model::ConnectionStatus;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Configuration for one feed activation.
#[derive(Debug, Clone)]
pub struct PriceFeedConfig {
    /// Symbol to stream (e.g., "BTCEUR").
    pub symbol: String,
    /// Stream base URL (e.g., "wss://stream.binance.com:9443").
    pub ws_base_url: String,
}

impl PriceFeedConfig {
    pub fn new(symbol: &str, ws_base_url: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ws_base_url: ws_base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn build_stream_url(config: &PriceFeedConfig) -> String {
    format!(
        "{}/ws/{}@miniTicker",
        config.ws_base_url,
        config.symbol.to_lowercase()
    )
}

/// State shared between a handle and its connection task.
///
/// Each `connect` call allocates a fresh instance, so events from a
/// superseded connection can never reach a newer handle.
#[derive(Debug)]
struct FeedState {
    status: ConnectionStatus,
    last_price: Option<Decimal>,
    /// Set by `disconnect`; once true, no event-driven write lands.
    detached: bool,
}

#[derive(Debug)]
struct FeedShared {
    state: Mutex<FeedState>,
}

impl FeedShared {
    fn new() -> Self {
        Self {
            state: Mutex::new(FeedState {
                status: ConnectionStatus::Connecting,
                last_price: None,
                detached: false,
            }),
        }
    }

    // A poisoned lock only means a writer panicked mid-store; the state
    // itself stays usable.
    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn status(&self) -> ConnectionStatus {
        self.lock().status
    }

    fn last_price(&self) -> Option<Decimal> {
        self.lock().last_price
    }

    fn is_detached(&self) -> bool {
        self.lock().detached
    }

    /// Status transition driven by the connection task. Suppressed after
    /// detach so the caller never observes a post-disconnect update.
    fn record_status(&self, status: ConnectionStatus) {
        let mut state = self.lock();
        if !state.detached {
            state.status = status;
        }
    }

    /// Price update driven by the connection task; same suppression rule.
    fn record_price(&self, price: Decimal) {
        let mut state = self.lock();
        if !state.detached {
            state.last_price = Some(price);
        }
    }

    /// Mark the handle's interest as ended. The caller-visible status
    /// becomes `Closed` unless the connection already terminated on its own.
    fn detach(&self) {
        let mut state = self.lock();
        if state.detached {
            return;
        }
        state.detached = true;
        if !state.status.is_terminal() {
            state.status = ConnectionStatus::Closed;
        }
    }
}

/// Handle to one feed activation.
///
/// Dropping the handle disconnects, but callers that re-enter (connect
/// again for the same symbol) should call [`disconnect`](Self::disconnect)
/// explicitly so teardown ordering is visible in their own flow.
#[derive(Debug)]
pub struct PriceFeedHandle {
    symbol: String,
    shared: Arc<FeedShared>,
    shutdown_tx: watch::Sender<bool>,
}

impl PriceFeedHandle {
    /// Symbol this handle streams.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.shared.status()
    }

    /// Latest observed price, if any tick has arrived.
    pub fn last_price(&self) -> Option<Decimal> {
        self.shared.last_price()
    }

    /// End interest in this connection. Idempotent and safe in any phase:
    ///
    /// - while `Connecting`, the close is deferred until the in-flight
    ///   handshake resolves, then performed immediately;
    /// - while `Open`, the connection closes right away;
    /// - after `Closed`/`Errored`, this is a no-op.
    ///
    /// No status or price update is observable afterwards, even if the
    /// transport still delivers events momentarily.
    pub fn disconnect(&self) {
        self.shared.detach();
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for PriceFeedHandle {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Open a streaming connection for one symbol.
///
/// Spawns the connection task on the current tokio runtime and returns
/// immediately; the handle starts in `Connecting`.
pub fn connect(config: PriceFeedConfig) -> PriceFeedHandle {
    let url = build_stream_url(&config);
    let shared = Arc::new(FeedShared::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(run_feed(url, shared.clone(), shutdown_rx));

    PriceFeedHandle {
        symbol: config.symbol,
        shared,
        shutdown_tx,
    }
}

/// One connection's lifetime: handshake, session loop, teardown.
async fn run_feed(url: String, shared: Arc<FeedShared>, mut shutdown_rx: watch::Receiver<bool>) {
    info!(url = %url, "Connecting to price stream");

    // The handshake is never abandoned mid-flight. A disconnect that lands
    // while connecting is honored right after the transport resolves, which
    // is what bounds the close delay for a half-open connection.
    let ws_stream = match connect_async(&url).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            error!(error = %e, "Price stream connection failed");
            shared.record_status(ConnectionStatus::Errored);
            return;
        }
    };

    if shared.is_detached() {
        info!("Interest ended during handshake, closing price stream");
        let mut ws_stream = ws_stream;
        let _ = ws_stream.close(None).await;
        return;
    }

    shared.record_status(ConnectionStatus::Open);
    info!("Price stream open");

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                // A dropped sender means the handle is gone; same teardown.
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!("Disconnect requested, closing price stream");
                    let _ = write.close().await;
                    return;
                }
            }

            msg_opt = read.next() => {
                match msg_opt {
                    Some(Ok(Message::Text(text))) => {
                        match parse_message(&text) {
                            Ok(ParsedMessage::Tick(tick)) => {
                                shared.record_price(tick.last_price);
                            }
                            Ok(ParsedMessage::Unknown) => {
                                // Other event types are not ours to handle.
                            }
                            Err(e) => {
                                warn!(error = %e, "Discarding unparseable price message");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        debug!("Received Ping, sending Pong");
                        if let Err(e) = write.send(Message::Pong(data)).await {
                            warn!(error = %e, "Failed to send Pong");
                            shared.record_status(ConnectionStatus::Errored);
                            return;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Price stream closed by server");
                        shared.record_status(ConnectionStatus::Closed);
                        return;
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Price stream error");
                        shared.record_status(ConnectionStatus::Errored);
                        return;
                    }
                    None => {
                        info!("Price stream ended");
                        shared.record_status(ConnectionStatus::Closed);
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}
