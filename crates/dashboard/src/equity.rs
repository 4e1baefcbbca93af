//! Account equity derived from the margin snapshot and the live price.

use backend_api::{AccountSnapshot, ApiError, MarginAsset, MarginBackend};
use rust_decimal::Decimal;

/// Holds the one-shot account snapshot and derives the fiat valuation.
///
/// The snapshot and the live price arrive from independent activities with
/// no ordering guarantee; `equity` stays `None` until both sides exist so
/// the UI renders a placeholder instead of a stale figure.
#[derive(Debug, Default)]
pub struct EquityPanel {
    snapshot: Option<AccountSnapshot>,
}

impl EquityPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the account snapshot, replacing any prior one wholesale.
    pub async fn load<B: MarginBackend + ?Sized>(&mut self, backend: &B) -> Result<(), ApiError> {
        self.snapshot = Some(backend.margin_account().await?);
        Ok(())
    }

    pub fn snapshot(&self) -> Option<&AccountSnapshot> {
        self.snapshot.as_ref()
    }

    /// Net base-asset balance from the snapshot, if loaded.
    pub fn net_base(&self) -> Option<Decimal> {
        self.snapshot.as_ref().map(|s| s.total_net_asset_of_base)
    }

    /// Fiat equity: net base balance times the live price. `None` while
    /// either input is unavailable.
    pub fn equity(&self, last_price: Option<Decimal>) -> Option<Decimal> {
        Some(self.net_base()? * last_price?)
    }

    /// Assets with a non-zero net amount. A view over the snapshot; the
    /// snapshot itself is not mutated.
    pub fn nonzero_assets(&self) -> impl Iterator<Item = &MarginAsset> {
        self.snapshot
            .iter()
            .flat_map(|s| s.assets.iter())
            .filter(|a| !a.net_asset.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{account_snapshot, FakeBackend};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_load_replaces_snapshot() {
        let backend = FakeBackend::new();
        backend.set_account(account_snapshot(dec!(0.08)));

        let mut panel = EquityPanel::new();
        assert!(panel.snapshot().is_none());

        panel.load(&backend).await.unwrap();
        assert_eq!(panel.net_base(), Some(dec!(0.08)));

        backend.set_account(account_snapshot(dec!(0.10)));
        panel.load(&backend).await.unwrap();
        assert_eq!(panel.net_base(), Some(dec!(0.10)));
    }

    #[tokio::test]
    async fn test_load_error_carries_status() {
        let backend = FakeBackend::new();
        backend.fail_with_status(500);

        let mut panel = EquityPanel::new();
        let err = panel.load(&backend).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(panel.snapshot().is_none());
    }

    #[test]
    fn test_equity_placeholder_until_both_sides_available() {
        let panel = EquityPanel::new();
        assert_eq!(panel.equity(Some(dec!(55980.12))), None);
        assert_eq!(panel.equity(None), None);
    }

    #[tokio::test]
    async fn test_equity_is_exact_product() {
        let backend = FakeBackend::new();
        backend.set_account(account_snapshot(dec!(0.12345678)));

        let mut panel = EquityPanel::new();
        panel.load(&backend).await.unwrap();

        assert_eq!(panel.equity(None), None);
        assert_eq!(
            panel.equity(Some(dec!(55980.12))),
            Some(dec!(0.12345678) * dec!(55980.12))
        );
    }

    #[tokio::test]
    async fn test_nonzero_assets_is_a_view() {
        let backend = FakeBackend::new();
        backend.set_account(account_snapshot(dec!(0.08)));

        let mut panel = EquityPanel::new();
        panel.load(&backend).await.unwrap();

        // account_snapshot carries one zero-balance entry (USDC).
        let visible: Vec<_> = panel.nonzero_assets().map(|a| a.asset.as_str()).collect();
        assert_eq!(visible, vec!["BTC"]);

        // The underlying snapshot keeps every entry.
        assert_eq!(panel.snapshot().unwrap().assets.len(), 2);
    }
}
