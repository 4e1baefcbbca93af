//! Backend abstraction consumed by the dashboard components.

use crate::error::ApiError;
use crate::types::{
    AccountSnapshot, BracketResult, DailyMetricsSnapshot, LiquidityStatus, OpenOrdersResponse,
};
use async_trait::async_trait;
use model::BracketIntent;

/// Operations the dashboard needs from the backend.
///
/// `BackendClient` is the production implementation; tests substitute an
/// in-memory fake so component behavior is exercised without a network.
#[async_trait]
pub trait MarginBackend: Send + Sync {
    /// Fetch the current margin account snapshot.
    async fn margin_account(&self) -> Result<AccountSnapshot, ApiError>;

    /// Submit a bracket (OCO) order built from percentage offsets.
    async fn create_bracket_order(&self, intent: &BracketIntent)
        -> Result<BracketResult, ApiError>;

    /// Fetch open orders filtered server-side by symbol and isolation flag.
    async fn open_orders(
        &self,
        symbol: &str,
        isolated: bool,
    ) -> Result<OpenOrdersResponse, ApiError>;

    /// Fetch the latest stored daily metrics snapshot.
    async fn daily_metrics(&self) -> Result<DailyMetricsSnapshot, ApiError>;

    /// Fetch the current liquidity status.
    async fn liquidity_status(&self) -> Result<LiquidityStatus, ApiError>;
}
