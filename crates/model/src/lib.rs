//! Shared domain types for the tradeworker dashboard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a streaming price connection.
///
/// Transitions are monotonic within one connection: `Connecting -> Open`,
/// then either `Closed` (remote or local close) or `Errored` (transport
/// failure). A connection disconnected before the handshake completes goes
/// straight from `Connecting` to `Closed` without ever exposing `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Open,
    Closed,
    Errored,
}

impl ConnectionStatus {
    /// True once the connection can no longer produce updates.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// One observation from the price stream. Superseded by the next tick; no
/// history is retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTick {
    pub symbol: String,
    pub last_price: Decimal,
}

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            _ => None,
        }
    }

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

/// A percentage-based bracket (take-profit/stop-loss) trade intent.
///
/// Percent fields are directional offsets from the reference price the
/// backend resolves at execution time; the dashboard never computes prices
/// itself, it forwards percentages and renders the returned absolutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketIntent {
    pub symbol: String,
    pub side: OrderSide,
    pub take_profit_percent: Decimal,
    pub stop_loss_percent: Decimal,
    pub isolated: bool,
    pub leverage: u32,
}

impl BracketIntent {
    /// Intent for the default instrument with the default margin settings.
    pub fn new(side: OrderSide, take_profit_percent: Decimal, stop_loss_percent: Decimal) -> Self {
        Self {
            symbol: "BTCUSDC".to_string(),
            side,
            take_profit_percent,
            stop_loss_percent,
            isolated: false,
            leverage: 20,
        }
    }
}

/// Partition key for open orders.
///
/// Orders belonging to one bracket share an order-list id; everything else
/// lands in `Standalone`. A tagged key avoids colliding with a real list id
/// that could ever equal a sentinel string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Bracket(i64),
    Standalone,
}

impl GroupKey {
    /// Key for an order's optional list id. `-1` is the backend's "not part
    /// of a list" marker.
    pub fn from_order_list_id(order_list_id: Option<i64>) -> Self {
        match order_list_id {
            Some(id) if id != -1 => Self::Bracket(id),
            _ => Self::Standalone,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bracket(id) => write!(f, "{}", id),
            Self::Standalone => write!(f, "single"),
        }
    }
}
