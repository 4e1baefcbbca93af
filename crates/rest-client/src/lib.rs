//! Generic REST client infrastructure.
//!
//! A thin wrapper around `reqwest` with:
//!
//! - Consistent error handling via `RestError`
//! - JSON response deserialization for GET and JSON-body POST
//! - A distinguished `NoData` condition for 404 responses
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_client::RestClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Status {
//!     regime: String,
//! }
//!
//! let client = RestClient::with_default_timeout("http://localhost:8080")?;
//! let status: Status = client.get("/api/liquidity/status", None).await?;
//! ```

mod client;
mod error;

pub use client::RestClient;
pub use error::RestError;
