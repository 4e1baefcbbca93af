//! Backend API payload types.

use model::OrderSide;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Response from GET /api/binance/margin-account.
///
/// Balance fields arrive as decimal strings and may exceed what an f64 can
/// display faithfully, so everything lands in `Decimal`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSnapshot {
    #[serde(
        rename = "totalNetAssetOfBase",
        deserialize_with = "deserialize_decimal_from_str"
    )]
    pub total_net_asset_of_base: Decimal,
    #[serde(default)]
    pub assets: Vec<MarginAsset>,
}

/// One instrument's balances within the margin account.
#[derive(Debug, Clone, Deserialize)]
pub struct MarginAsset {
    pub asset: String,
    #[serde(deserialize_with = "deserialize_decimal_from_str")]
    pub free: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_from_str")]
    pub locked: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_from_str")]
    pub borrowed: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_from_str")]
    pub interest: Decimal,
    #[serde(rename = "netAsset", deserialize_with = "deserialize_decimal_from_str")]
    pub net_asset: Decimal,
}

/// Response from POST /api/binance/margin/order/oco.
///
/// The backend resolves percentages against the market reference price and
/// reports every leg it touched. A partial multi-leg failure arrives as a
/// non-2xx response, not as a partially populated success.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketResult {
    pub symbol: String,
    pub entry_side: OrderSide,
    pub quantity: Decimal,
    pub reference_price: Decimal,
    pub take_profit_price: Decimal,
    pub stop_loss_price: Decimal,
    #[serde(default)]
    pub borrow_asset: Option<String>,
    #[serde(default)]
    pub borrow_amount: Option<Decimal>,
    #[serde(default)]
    pub borrow_order: Option<OrderRef>,
    #[serde(default)]
    pub entry_order: Option<OrderRef>,
    /// The bracket (OCO) leg. Its identifiers are the correlation key the
    /// open-order board highlights against.
    #[serde(default)]
    pub oco_order: Option<OrderRef>,
}

/// Reference to one order leg inside a `BracketResult`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub order_id: i64,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default, rename = "type")]
    pub order_type: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

/// Response from GET /api/binance/margin/open-orders.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrdersResponse {
    pub has_open_orders: bool,
    #[serde(default)]
    pub orders: Vec<OpenOrder>,
}

/// One working order as reported by the open-orders endpoint.
///
/// Every field is optional: the backend passes through whatever the exchange
/// reported, and the two identifier families (exchange ids and client ids)
/// are not guaranteed to both be present. Prices stay as strings; this is
/// display data, not arithmetic input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub order_list_id: Option<i64>,
    #[serde(default)]
    pub list_client_order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub stop_price: Option<String>,
    #[serde(default, rename = "type")]
    pub order_type: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

/// Response from GET /metrics/btc/daily/latest.
///
/// Each metric is independently nullable; absent or null values render as
/// placeholders downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetricsSnapshot {
    pub id: i64,
    pub as_of: String,
    #[serde(default, rename = "return1d")]
    pub return_1d: Option<Decimal>,
    #[serde(default, rename = "return3d")]
    pub return_3d: Option<Decimal>,
    #[serde(default, rename = "realizedVol7d")]
    pub realized_vol_7d: Option<Decimal>,
    #[serde(default, rename = "atr14")]
    pub atr_14: Option<Decimal>,
    #[serde(default, rename = "deltaOpenInterest24h")]
    pub delta_open_interest_24h: Option<Decimal>,
    #[serde(default, rename = "fundingRateZScore30d")]
    pub funding_rate_z_score_30d: Option<Decimal>,
    #[serde(default, rename = "takerBuySellRatio24h")]
    pub taker_buy_sell_ratio_24h: Option<Decimal>,
    #[serde(default, rename = "liquidationLongVolumeUsd24h")]
    pub liquidation_long_volume_usd_24h: Option<Decimal>,
    #[serde(default, rename = "liquidationShortVolumeUsd24h")]
    pub liquidation_short_volume_usd_24h: Option<Decimal>,
    #[serde(default, rename = "volumeRelative24h")]
    pub volume_relative_24h: Option<Decimal>,
}

/// Response from GET /api/liquidity/status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityStatus {
    pub date: String,
    pub m2_value: Decimal,
    pub yoy_change_pct: Decimal,
    /// Raw regime string; unknown values are preserved verbatim.
    pub regime: String,
}

impl LiquidityStatus {
    /// The recognized regime, if the backend sent one of the known values.
    pub fn known_regime(&self) -> Option<LiquidityRegime> {
        LiquidityRegime::from_wire_str(&self.regime)
    }
}

/// Liquidity regime classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidityRegime {
    Expansion,
    Contraction,
    Neutral,
}

impl LiquidityRegime {
    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "EXPANSION" => Some(Self::Expansion),
            "CONTRACTION" => Some(Self::Contraction),
            "NEUTRAL" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Deserialize a Decimal from a string.
fn deserialize_decimal_from_str<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: &str = Deserialize::deserialize(deserializer)?;
    s.parse::<Decimal>().map_err(serde::de::Error::custom)
}
