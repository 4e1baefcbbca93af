//! Backend environment configuration.
//!
//! The dashboard talks to two endpoints: the self-hosted tradeworker backend
//! (REST) and the exchange's public market-data stream (WebSocket). Both are
//! overridable through environment variables so the same binary runs against
//! a local backend or a deployed one.

/// Environment variable overriding the backend REST base URL.
pub const API_BASE_URL_VAR: &str = "TRADEWORKER_API_BASE_URL";

/// Environment variable overriding the price stream base URL.
pub const WS_BASE_URL_VAR: &str = "TRADEWORKER_WS_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_WS_BASE_URL: &str = "wss://stream.binance.com:9443";

/// Resolved endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEnvironment {
    api_base_url: String,
    ws_base_url: String,
}

impl Default for BackendEnvironment {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_base_url: DEFAULT_WS_BASE_URL.to_string(),
        }
    }
}

impl BackendEnvironment {
    /// Build an environment from explicit URLs. Trailing slashes are trimmed
    /// so path concatenation stays uniform.
    pub fn new(api_base_url: &str, ws_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            ws_base_url: ws_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Load the environment from `TRADEWORKER_API_BASE_URL` and
    /// `TRADEWORKER_WS_BASE_URL`, falling back to defaults for unset vars.
    pub fn from_env() -> Self {
        let api = std::env::var(API_BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_API_BASE_URL.into());
        let ws = std::env::var(WS_BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_WS_BASE_URL.into());
        Self::new(&api, &ws)
    }

    /// Backend REST base URL.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Price stream base URL.
    pub fn ws_base_url(&self) -> &str {
        &self.ws_base_url
    }
}
