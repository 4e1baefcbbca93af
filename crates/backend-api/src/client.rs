//! HTTP implementation of the backend API.

use crate::backend::MarginBackend;
use crate::error::ApiError;
use crate::types::{
    AccountSnapshot, BracketResult, DailyMetricsSnapshot, LiquidityStatus, OpenOrdersResponse,
};
use async_trait::async_trait;
use common::BackendEnvironment;
use model::BracketIntent;
use rest_client::RestClient;

/// Typed client for the tradeworker backend.
pub struct BackendClient {
    client: RestClient,
}

impl BackendClient {
    /// Create a client for the given environment.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(environment: &BackendEnvironment) -> Result<Self, ApiError> {
        let client =
            RestClient::with_default_timeout(environment.api_base_url()).map_err(ApiError::Rest)?;
        Ok(Self { client })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl MarginBackend for BackendClient {
    async fn margin_account(&self) -> Result<AccountSnapshot, ApiError> {
        tracing::debug!("Fetching margin account snapshot");

        let snapshot: AccountSnapshot = self
            .client
            .get("/api/binance/margin-account", None)
            .await
            .map_err(ApiError::from_rest)?;

        tracing::debug!(
            net_base = %snapshot.total_net_asset_of_base,
            assets = snapshot.assets.len(),
            "Margin account snapshot received"
        );

        Ok(snapshot)
    }

    async fn create_bracket_order(
        &self,
        intent: &BracketIntent,
    ) -> Result<BracketResult, ApiError> {
        tracing::info!(
            symbol = %intent.symbol,
            side = intent.side.as_wire_str(),
            take_profit_percent = %intent.take_profit_percent,
            stop_loss_percent = %intent.stop_loss_percent,
            leverage = intent.leverage,
            isolated = intent.isolated,
            "Submitting bracket order"
        );

        let result: BracketResult = self
            .client
            .post_json("/api/binance/margin/order/oco", intent)
            .await
            .map_err(ApiError::from_rest)?;

        tracing::info!(
            symbol = %result.symbol,
            reference_price = %result.reference_price,
            oco_order_id = result.oco_order.as_ref().map(|o| o.order_id),
            "Bracket order created"
        );

        Ok(result)
    }

    async fn open_orders(
        &self,
        symbol: &str,
        isolated: bool,
    ) -> Result<OpenOrdersResponse, ApiError> {
        let query = format!("symbol={}&isolated={}", symbol, isolated);
        tracing::debug!(symbol = %symbol, isolated = isolated, "Fetching open orders");

        let response: OpenOrdersResponse = self
            .client
            .get("/api/binance/margin/open-orders", Some(&query))
            .await
            .map_err(ApiError::from_rest)?;

        tracing::debug!(
            has_open_orders = response.has_open_orders,
            orders = response.orders.len(),
            "Open orders received"
        );

        Ok(response)
    }

    async fn daily_metrics(&self) -> Result<DailyMetricsSnapshot, ApiError> {
        self.client
            .get("/metrics/btc/daily/latest", None)
            .await
            .map_err(ApiError::from_rest)
    }

    async fn liquidity_status(&self) -> Result<LiquidityStatus, ApiError> {
        self.client
            .get("/api/liquidity/status", None)
            .await
            .map_err(ApiError::from_rest)
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.client.base_url())
            .finish()
    }
}
