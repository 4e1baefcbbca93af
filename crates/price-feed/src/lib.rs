//! Live price stream for a single symbol.
//!
//! One `connect` call owns one WebSocket connection to the exchange's
//! mini-ticker stream and hands back a [`PriceFeedHandle`] exposing the
//! connection status and the latest observed price. The handle survives
//! rapid connect/disconnect/connect cycles without leaking sockets or
//! attributing a superseded connection's events to a newer handle: all
//! state is scoped to the activation, and `disconnect` suppresses every
//! later write.
//!
//! The feed never reconnects on its own; callers that want a long-lived
//! display re-invoke `connect` (see the runner's supervision loop).

mod feed;
mod parser;

pub use feed::{connect, PriceFeedConfig, PriceFeedHandle};
