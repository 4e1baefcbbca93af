//! Backend API error types.

use rest_client::RestError;
use thiserror::Error;

/// Errors surfaced by backend API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or HTTP-level failure.
    #[error("REST client error: {0}")]
    Rest(#[from] RestError),

    /// The read endpoint has nothing stored yet (404).
    #[error("no data available yet")]
    NoData,
}

impl ApiError {
    /// Collapse the rest-client's 404 marker into the API-level variant so
    /// callers match one thing.
    pub fn from_rest(err: RestError) -> Self {
        if err.is_no_data() {
            Self::NoData
        } else {
            Self::Rest(err)
        }
    }

    /// Transport status code, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rest(rest) => rest.status(),
            Self::NoData => Some(404),
        }
    }

    /// True when the failure means "nothing stored yet" rather than a fault.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}
