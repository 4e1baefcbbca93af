//! Shared utilities: logging bootstrap, backend environment, reconnect backoff.

mod backoff;
mod environment;
mod logging;

pub use backoff::ReconnectBackoff;
pub use environment::BackendEnvironment;
pub use logging::init_logging;
