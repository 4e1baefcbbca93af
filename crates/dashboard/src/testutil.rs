//! In-memory backend fake and fixture builders shared by component tests.

use async_trait::async_trait;
use backend_api::{
    AccountSnapshot, ApiError, BracketResult, DailyMetricsSnapshot, LiquidityStatus, MarginAsset,
    MarginBackend, OpenOrder, OpenOrdersResponse, OrderRef,
};
use model::{BracketIntent, OrderSide};
use rest_client::RestError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scriptable `MarginBackend` for tests: prime responses, inject failures,
/// and optionally hold bracket calls open to exercise the busy guard.
pub struct FakeBackend {
    account: Mutex<Option<AccountSnapshot>>,
    bracket: Mutex<Option<BracketResult>>,
    open_orders: Mutex<Option<OpenOrdersResponse>>,
    metrics: Mutex<Option<DailyMetricsSnapshot>>,
    liquidity: Mutex<Option<LiquidityStatus>>,
    fail_status: Mutex<Option<u16>>,
    hold: AtomicBool,
    /// Signaled when a bracket call enters the fake.
    pub entered: Notify,
    /// Releases a held bracket call.
    pub release: Notify,
    /// Number of bracket calls issued.
    pub bracket_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            account: Mutex::new(None),
            bracket: Mutex::new(None),
            open_orders: Mutex::new(None),
            metrics: Mutex::new(None),
            liquidity: Mutex::new(None),
            fail_status: Mutex::new(None),
            hold: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
            bracket_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_account(&self, snapshot: AccountSnapshot) {
        *lock(&self.account) = Some(snapshot);
    }

    pub fn set_bracket_result(&self, result: BracketResult) {
        *lock(&self.bracket) = Some(result);
    }

    pub fn set_open_orders(&self, response: OpenOrdersResponse) {
        *lock(&self.open_orders) = Some(response);
    }

    pub fn set_metrics(&self, metrics: DailyMetricsSnapshot) {
        *lock(&self.metrics) = Some(metrics);
    }

    pub fn set_liquidity(&self, status: LiquidityStatus) {
        *lock(&self.liquidity) = Some(status);
    }

    /// Every subsequent call fails with this HTTP status.
    pub fn fail_with_status(&self, status: u16) {
        *lock(&self.fail_status) = Some(status);
    }

    pub fn clear_failure(&self) {
        *lock(&self.fail_status) = None;
    }

    /// Make bracket calls block until `release` is notified.
    pub fn hold_bracket_calls(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    fn failure(&self) -> Option<ApiError> {
        lock(&self.fail_status).map(|status| {
            ApiError::from_rest(RestError::Http {
                status,
                message: "fake failure".to_string(),
            })
        })
    }
}

#[async_trait]
impl MarginBackend for FakeBackend {
    async fn margin_account(&self) -> Result<AccountSnapshot, ApiError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        lock(&self.account).clone().ok_or_else(|| {
            ApiError::from_rest(RestError::Http {
                status: 500,
                message: "fake: account not primed".to_string(),
            })
        })
    }

    async fn create_bracket_order(
        &self,
        _intent: &BracketIntent,
    ) -> Result<BracketResult, ApiError> {
        self.bracket_calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();

        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }

        if let Some(err) = self.failure() {
            return Err(err);
        }
        lock(&self.bracket).clone().ok_or_else(|| {
            ApiError::from_rest(RestError::Http {
                status: 500,
                message: "fake: bracket result not primed".to_string(),
            })
        })
    }

    async fn open_orders(
        &self,
        _symbol: &str,
        _isolated: bool,
    ) -> Result<OpenOrdersResponse, ApiError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        lock(&self.open_orders).clone().ok_or_else(|| {
            ApiError::from_rest(RestError::Http {
                status: 500,
                message: "fake: open orders not primed".to_string(),
            })
        })
    }

    async fn daily_metrics(&self) -> Result<DailyMetricsSnapshot, ApiError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        lock(&self.metrics).clone().ok_or(ApiError::NoData)
    }

    async fn liquidity_status(&self) -> Result<LiquidityStatus, ApiError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        lock(&self.liquidity).clone().ok_or(ApiError::NoData)
    }
}

/// Snapshot with one non-zero BTC entry and one all-zero USDC entry.
pub fn account_snapshot(net_base: Decimal) -> AccountSnapshot {
    AccountSnapshot {
        total_net_asset_of_base: net_base,
        assets: vec![
            MarginAsset {
                asset: "BTC".to_string(),
                free: net_base,
                locked: dec!(0),
                borrowed: dec!(0),
                interest: dec!(0),
                net_asset: net_base,
            },
            MarginAsset {
                asset: "USDC".to_string(),
                free: dec!(0),
                locked: dec!(0),
                borrowed: dec!(0),
                interest: dec!(0),
                net_asset: dec!(0),
            },
        ],
    }
}

/// Successful submission result whose OCO leg carries the given ids.
pub fn bracket_result_with_oco(order_id: i64, client_id: Option<&str>) -> BracketResult {
    BracketResult {
        symbol: "BTCUSDC".to_string(),
        entry_side: OrderSide::Sell,
        quantity: dec!(0.002),
        reference_price: dec!(60120.5),
        take_profit_price: dec!(59399.05),
        stop_loss_price: dec!(60481.22),
        borrow_asset: None,
        borrow_amount: None,
        borrow_order: None,
        entry_order: None,
        oco_order: Some(OrderRef {
            order_id,
            client_order_id: client_id.map(String::from),
            status: None,
            price: None,
            stop_price: None,
            order_type: None,
            side: None,
        }),
    }
}

/// Minimal open order with the fields grouping cares about.
pub fn open_order(order_id: u64, order_list_id: Option<i64>) -> OpenOrder {
    OpenOrder {
        order_id: Some(order_id),
        order_list_id,
        ..OpenOrder::default()
    }
}
