//! Market context readers: daily metrics and liquidity regime.

use backend_api::{ApiError, DailyMetricsSnapshot, LiquidityStatus, MarginBackend};

/// Holds the latest fetched market context.
///
/// Both readers tolerate the backend having nothing stored yet: a 404 maps
/// to an empty panel (`Ok(false)`), not a failure.
#[derive(Debug, Default)]
pub struct MarketContextPanel {
    metrics: Option<DailyMetricsSnapshot>,
    liquidity: Option<LiquidityStatus>,
}

impl MarketContextPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the latest daily metrics. Returns `Ok(true)` when data
    /// arrived, `Ok(false)` when the backend has no snapshot stored yet.
    pub async fn load_metrics<B: MarginBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<bool, ApiError> {
        match backend.daily_metrics().await {
            Ok(metrics) => {
                self.metrics = Some(metrics);
                Ok(true)
            }
            Err(e) if e.is_no_data() => {
                self.metrics = None;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the current liquidity status; same no-data tolerance.
    pub async fn load_liquidity<B: MarginBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<bool, ApiError> {
        match backend.liquidity_status().await {
            Ok(status) => {
                self.liquidity = Some(status);
                Ok(true)
            }
            Err(e) if e.is_no_data() => {
                self.liquidity = None;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn metrics(&self) -> Option<&DailyMetricsSnapshot> {
        self.metrics.as_ref()
    }

    pub fn liquidity(&self) -> Option<&LiquidityStatus> {
        self.liquidity.as_ref()
    }
}
