//! Open orders grouped by parent bracket, with new-bracket highlighting.

use crate::store::{HighlightMemory, KeyValueStore};
use backend_api::{ApiError, MarginBackend, OpenOrder};
use model::GroupKey;
use std::sync::Arc;
use tracing::debug;

/// One group of open orders sharing a bracket, or the standalone bucket.
#[derive(Debug, Clone)]
pub struct OrderGroup {
    pub key: GroupKey,
    pub orders: Vec<OpenOrder>,
    /// True when this group matches the remembered last-created bracket.
    pub highlighted: bool,
}

/// Partition orders by group key, preserving the original order of members
/// within each group and the order in which keys first appear. Every order
/// lands in exactly one group.
pub fn group_orders(orders: Vec<OpenOrder>) -> Vec<OrderGroup> {
    let mut groups: Vec<OrderGroup> = Vec::new();

    for order in orders {
        let key = GroupKey::from_order_list_id(order.order_list_id);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.orders.push(order),
            None => groups.push(OrderGroup {
                key,
                orders: vec![order],
                highlighted: false,
            }),
        }
    }

    groups
}

/// Dual-identifier match: the id remembered at creation time and the id on
/// the fetched open orders are not guaranteed to use the same field, so a
/// group is highlighted when either side matches.
fn is_highlighted(group: &OrderGroup, memory: &HighlightMemory) -> bool {
    let list_id_match = match (&group.key, &memory.list_id) {
        (GroupKey::Bracket(id), Some(remembered)) => id.to_string() == *remembered,
        _ => false,
    };

    let client_id_match = memory
        .list_client_order_id
        .as_deref()
        .map_or(false, |remembered| {
            group.orders.iter().any(|order| {
                order.client_order_id.as_deref() == Some(remembered)
                    || order.list_client_order_id.as_deref() == Some(remembered)
            })
        });

    list_id_match || client_id_match
}

fn apply_highlight(groups: &mut [OrderGroup], memory: &HighlightMemory) {
    for group in groups.iter_mut() {
        group.highlighted = is_highlighted(group, memory);
    }
}

/// Fetches open orders and derives the grouped, highlighted view.
///
/// `load` may be invoked repeatedly (manual refresh); each successful call
/// fully replaces the previous groups. The highlight memory is read here
/// and never cleared: a highlight survives reloads until the workflow
/// overwrites it with the next created bracket.
pub struct OpenOrderBoard<B: MarginBackend> {
    backend: Arc<B>,
    store: Arc<dyn KeyValueStore>,
    groups: Vec<OrderGroup>,
}

impl<B: MarginBackend> OpenOrderBoard<B> {
    pub fn new(backend: Arc<B>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            store,
            groups: Vec::new(),
        }
    }

    /// Fetch and regroup. On failure the previous groups are kept so the UI
    /// can show the error next to the last good data.
    pub async fn load(&mut self, symbol: &str, isolated: bool) -> Result<(), ApiError> {
        let response = self.backend.open_orders(symbol, isolated).await?;

        self.groups = if response.has_open_orders {
            let mut groups = group_orders(response.orders);
            let memory = HighlightMemory::load(&*self.store);
            apply_highlight(&mut groups, &memory);
            groups
        } else {
            Vec::new()
        };

        debug!(
            symbol = %symbol,
            groups = self.groups.len(),
            highlighted = self.groups.iter().filter(|g| g.highlighted).count(),
            "Open orders regrouped"
        );

        Ok(())
    }

    /// Current grouped view.
    pub fn groups(&self) -> &[OrderGroup] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testutil::{open_order, FakeBackend};
    use backend_api::OpenOrdersResponse;

    fn memory(list_id: Option<&str>, client_id: Option<&str>) -> HighlightMemory {
        HighlightMemory {
            list_id: list_id.map(String::from),
            list_client_order_id: client_id.map(String::from),
        }
    }

    #[test]
    fn test_grouping_splits_brackets_and_standalone() {
        let orders = vec![
            open_order(11, Some(5)),
            open_order(12, Some(5)),
            open_order(13, Some(-1)),
        ];

        let groups = group_orders(orders);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].key, GroupKey::Bracket(5));
        assert_eq!(groups[0].orders.len(), 2);
        assert_eq!(groups[0].orders[0].order_id, Some(11));
        assert_eq!(groups[0].orders[1].order_id, Some(12));

        assert_eq!(groups[1].key, GroupKey::Standalone);
        assert_eq!(groups[1].orders.len(), 1);
        assert_eq!(groups[1].orders[0].order_id, Some(13));
    }

    #[test]
    fn test_grouping_preserves_first_appearance_order() {
        let orders = vec![
            open_order(1, None),
            open_order(2, Some(9)),
            open_order(3, Some(4)),
            open_order(4, Some(9)),
        ];

        let keys: Vec<_> = group_orders(orders).into_iter().map(|g| g.key).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::Standalone,
                GroupKey::Bracket(9),
                GroupKey::Bracket(4)
            ]
        );
    }

    #[test]
    fn test_missing_list_id_lands_standalone() {
        let groups = group_orders(vec![open_order(1, None), open_order(2, Some(-1))]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, GroupKey::Standalone);
        assert_eq!(groups[0].orders.len(), 2);
    }

    #[test]
    fn test_highlight_by_list_id() {
        let mut groups = group_orders(vec![
            open_order(11, Some(5)),
            open_order(12, Some(5)),
            open_order(13, Some(6)),
        ]);

        apply_highlight(&mut groups, &memory(Some("5"), None));

        assert!(groups[0].highlighted);
        assert!(!groups[1].highlighted);
    }

    #[test]
    fn test_highlight_by_client_order_id() {
        let mut with_client_id = open_order(11, Some(5));
        with_client_id.client_order_id = Some("oco-1".into());

        let mut groups = group_orders(vec![with_client_id, open_order(13, Some(6))]);

        // No list id remembered; the client id alone must match.
        apply_highlight(&mut groups, &memory(None, Some("oco-1")));

        assert!(groups[0].highlighted);
        assert!(!groups[1].highlighted);
    }

    #[test]
    fn test_highlight_by_list_client_order_id() {
        let mut with_list_client_id = open_order(11, Some(5));
        with_list_client_id.list_client_order_id = Some("oco-list-1".into());

        let mut groups = group_orders(vec![with_list_client_id]);
        apply_highlight(&mut groups, &memory(Some("999"), Some("oco-list-1")));

        assert!(groups[0].highlighted);
    }

    #[test]
    fn test_no_highlight_with_empty_memory() {
        let mut groups = group_orders(vec![open_order(11, Some(5))]);
        apply_highlight(&mut groups, &HighlightMemory::default());
        assert!(!groups[0].highlighted);
    }

    #[test]
    fn test_standalone_group_never_matches_list_id() {
        let mut groups = group_orders(vec![open_order(1, None)]);
        apply_highlight(&mut groups, &memory(Some("5"), None));
        assert!(!groups[0].highlighted);
    }

    #[tokio::test]
    async fn test_load_with_no_open_orders_yields_zero_groups() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_open_orders(OpenOrdersResponse {
            has_open_orders: false,
            // Defensive server data: orders present despite the flag must
            // still yield nothing.
            orders: vec![open_order(1, Some(5))],
        });

        let store = Arc::new(MemoryStore::new());
        store.set(crate::store::HIGHLIGHT_LIST_ID_KEY, "5");

        let mut board = OpenOrderBoard::new(backend, store);
        board.load("BTCUSDC", false).await.unwrap();

        assert!(board.groups().is_empty());
    }

    #[tokio::test]
    async fn test_load_replaces_groups_wholesale() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_open_orders(OpenOrdersResponse {
            has_open_orders: true,
            orders: vec![open_order(11, Some(5)), open_order(12, Some(5))],
        });

        let mut board = OpenOrderBoard::new(backend.clone(), Arc::new(MemoryStore::new()));
        board.load("BTCUSDC", false).await.unwrap();
        assert_eq!(board.groups().len(), 1);

        backend.set_open_orders(OpenOrdersResponse {
            has_open_orders: true,
            orders: vec![open_order(21, None)],
        });
        board.load("BTCUSDC", false).await.unwrap();

        assert_eq!(board.groups().len(), 1);
        assert_eq!(board.groups()[0].key, GroupKey::Standalone);
    }

    // End-to-end correlation: a submitted bracket's persisted ids make the
    // matching group light up on the next load.
    #[tokio::test]
    async fn test_created_bracket_is_highlighted_on_next_load() {
        use crate::bracket::BracketWorkflow;
        use crate::testutil::bracket_result_with_oco;
        use model::{BracketIntent, OrderSide};
        use rust_decimal_macros::dec;

        let backend = Arc::new(FakeBackend::new());
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());

        backend.set_bracket_result(bracket_result_with_oco(205, Some("oco-1")));
        let workflow = BracketWorkflow::new(backend.clone(), store.clone());
        workflow.propose(BracketIntent::new(OrderSide::Sell, dec!(1.2), dec!(0.6)));
        let result = workflow.confirm().await.unwrap();
        let oco_id = result.oco_order.unwrap().order_id;

        let mut tp_leg = open_order(301, Some(oco_id));
        tp_leg.order_type = Some("TAKE_PROFIT_LIMIT".into());
        let mut sl_leg = open_order(302, Some(oco_id));
        sl_leg.order_type = Some("STOP_LOSS_LIMIT".into());

        backend.set_open_orders(OpenOrdersResponse {
            has_open_orders: true,
            orders: vec![tp_leg, sl_leg, open_order(303, None)],
        });

        let mut board = OpenOrderBoard::new(backend, store);
        board.load("BTCUSDC", false).await.unwrap();

        assert_eq!(board.groups().len(), 2);
        assert_eq!(board.groups()[0].key, GroupKey::Bracket(205));
        assert!(board.groups()[0].highlighted);
        assert!(!board.groups()[1].highlighted);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_groups() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_open_orders(OpenOrdersResponse {
            has_open_orders: true,
            orders: vec![open_order(11, Some(5))],
        });

        let mut board = OpenOrderBoard::new(backend.clone(), Arc::new(MemoryStore::new()));
        board.load("BTCUSDC", false).await.unwrap();
        assert_eq!(board.groups().len(), 1);

        backend.fail_with_status(503);
        let err = board.load("BTCUSDC", false).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(board.groups().len(), 1);
    }
}
