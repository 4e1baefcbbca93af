//! Dashboard components: the stateful pieces between the backend API and a
//! rendering layer.
//!
//! - [`EquityPanel`] joins the one-shot margin account snapshot with the
//!   live price at render time.
//! - [`BracketWorkflow`] drives the review-then-send submission of a
//!   percentage-based bracket order and persists the created bracket's
//!   identifiers for later highlighting.
//! - [`OpenOrderBoard`] fetches open orders, groups them by their parent
//!   bracket, and flags the group matching the remembered identifiers.
//! - [`KeyValueStore`] is the injected persistence seam shared by the
//!   writer (workflow) and the reader (board).
//!
//! None of these components render anything; they expose plain state a UI
//! layer formats however it likes.

mod bracket;
mod context;
mod equity;
mod open_orders;
mod store;

#[cfg(test)]
mod testutil;

pub use bracket::{BracketError, BracketWorkflow};
pub use context::MarketContextPanel;
pub use equity::EquityPanel;
pub use open_orders::{group_orders, OpenOrderBoard, OrderGroup};
pub use store::{
    HighlightMemory, JsonFileStore, KeyValueStore, MemoryStore, HIGHLIGHT_LIST_CLIENT_ID_KEY,
    HIGHLIGHT_LIST_ID_KEY,
};
