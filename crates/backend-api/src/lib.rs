//! Typed client for the tradeworker backend REST API.
//!
//! The backend owns exchange connectivity, authentication, and order
//! execution; this crate only speaks its JSON surface:
//!
//! - **Margin account**: one-shot snapshot of balances and net equity
//! - **Bracket orders**: percentage-based OCO creation with a structured
//!   multi-leg result
//! - **Open orders**: the current working set, filtered by symbol
//! - **Market context**: daily metrics and liquidity regime readers
//!
//! # Example
//!
//! ```rust,ignore
//! use backend_api::BackendClient;
//! use common::BackendEnvironment;
//!
//! let env = BackendEnvironment::from_env();
//! let client = BackendClient::new(&env)?;
//!
//! let account = client.margin_account().await?;
//! println!("net base asset: {}", account.total_net_asset_of_base);
//! ```

mod backend;
mod client;
mod error;
mod types;

pub use backend::MarginBackend;
pub use client::BackendClient;
pub use error::ApiError;
pub use types::{
    AccountSnapshot, BracketResult, DailyMetricsSnapshot, LiquidityRegime, LiquidityStatus,
    MarginAsset, OpenOrder, OpenOrdersResponse, OrderRef,
};
