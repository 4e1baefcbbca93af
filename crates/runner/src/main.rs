//! Dashboard monitor binary.
//!
//! Wires the components together: loads the account snapshot and market
//! context once, keeps a price feed alive with caller-layered reconnection,
//! and renders an equity line on an interval.

use backend_api::BackendClient;
use common::{init_logging, BackendEnvironment, ReconnectBackoff};
use dashboard::{EquityPanel, JsonFileStore, MarketContextPanel, OpenOrderBoard};
use directories::ProjectDirs;
use price_feed::PriceFeedConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// How often the equity line is rendered.
const RENDER_INTERVAL: Duration = Duration::from_secs(5);

/// Feed uptime after which the reconnect backoff resets.
const STABLE_FEED_THRESHOLD: Duration = Duration::from_secs(300);

/// Valuation pair streamed for the equity figure.
const PRICE_SYMBOL: &str = "BTCEUR";

/// Instrument whose open orders are shown.
const ORDER_SYMBOL: &str = "BTCUSDC";

fn highlight_store_path() -> PathBuf {
    ProjectDirs::from("", "", "tradeworker")
        .map(|dirs| dirs.data_dir().join("highlight.json"))
        .unwrap_or_else(|| std::env::temp_dir().join("tradeworker-highlight.json"))
}

#[tokio::main]
async fn main() {
    init_logging();

    let environment = BackendEnvironment::from_env();
    info!(
        api = environment.api_base_url(),
        ws = environment.ws_base_url(),
        "Starting tradeworker dashboard"
    );

    let client = match BackendClient::new(&environment) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "Failed to build backend client");
            return;
        }
    };

    let store = Arc::new(JsonFileStore::open(&highlight_store_path()));

    // Shutdown on Ctrl+C. The sender stays in scope so the receiver never
    // sees a closed channel while the loop runs.
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            let _ = shutdown_tx_clone.send(true);
        }
    });

    // One-shot account snapshot; a failure degrades to a placeholder.
    let mut equity = EquityPanel::new();
    match equity.load(&*client).await {
        Ok(()) => {
            let assets: Vec<String> = equity
                .nonzero_assets()
                .map(|a| format!("{} {}", a.asset, a.net_asset))
                .collect();
            info!(
                net_base = %equity.net_base().unwrap_or_default(),
                assets = ?assets,
                "Margin account loaded"
            );
        }
        Err(e) => {
            warn!(error = %e, "Could not load margin account");
        }
    }

    // Market context; "no data yet" is fine on a fresh backend.
    let mut context = MarketContextPanel::new();
    match context.load_metrics(&*client).await {
        Ok(true) => {
            if let Some(metrics) = context.metrics() {
                info!(as_of = %metrics.as_of, "Daily metrics loaded");
            }
        }
        Ok(false) => info!("No daily metrics stored yet"),
        Err(e) => warn!(error = %e, "Could not load daily metrics"),
    }
    match context.load_liquidity(&*client).await {
        Ok(true) => {
            if let Some(status) = context.liquidity() {
                info!(regime = %status.regime, yoy = %status.yoy_change_pct, "Liquidity status loaded");
            }
        }
        Ok(false) => info!("No liquidity status stored yet"),
        Err(e) => warn!(error = %e, "Could not load liquidity status"),
    }

    // Open orders, grouped by bracket with the remembered one flagged.
    let mut board = OpenOrderBoard::new(client.clone(), store.clone());
    match board.load(ORDER_SYMBOL, false).await {
        Ok(()) => {
            for group in board.groups() {
                info!(
                    group = %group.key,
                    orders = group.orders.len(),
                    highlighted = group.highlighted,
                    "Open order group"
                );
            }
            if board.groups().is_empty() {
                info!(symbol = ORDER_SYMBOL, "No open orders");
            }
        }
        Err(e) => warn!(error = %e, "Could not load open orders"),
    }

    // Feed supervision: the feed itself never reconnects, so each lost
    // connection is replaced here with a fresh activation.
    let mut backoff = ReconnectBackoff::default();

    'supervision: loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let handle = price_feed::connect(PriceFeedConfig::new(
            PRICE_SYMBOL,
            environment.ws_base_url(),
        ));
        let connected_at = Instant::now();
        let mut render = tokio::time::interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                _ = render.tick() => {
                    let status = handle.status();
                    match equity.equity(handle.last_price()) {
                        Some(value) => info!(
                            feed = %status,
                            price = %handle.last_price().unwrap_or_default(),
                            equity = %value,
                            "Equity"
                        ),
                        None => info!(feed = %status, "Equity unavailable"),
                    }

                    if status.is_terminal() {
                        break;
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        handle.disconnect();
                        break 'supervision;
                    }
                }
            }
        }

        handle.disconnect();

        if connected_at.elapsed() >= STABLE_FEED_THRESHOLD {
            backoff.reset();
        }
        let delay = backoff.next_delay();
        warn!(
            attempt = backoff.attempt(),
            delay_secs = delay.as_secs(),
            "Price stream lost, reconnecting"
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Shutdown complete");
}
