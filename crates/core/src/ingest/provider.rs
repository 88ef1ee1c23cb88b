use crate::ingest::types::{Announcement, ExtraDetails, Snapshot, SymbolRecord};
use anyhow::Result;

/// Seam over the market-data vendor so the index and the tests can swap in
/// stub providers.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Full tradable-symbol universe. Errors surface here; the index layer
    /// absorbs them into an empty universe.
    async fn fetch_symbol_index(&self) -> Result<Vec<SymbolRecord>>;

    /// Valuation snapshot and recent announcements for one ticker. `None`
    /// marks a transport-level failure of that call; a reachable endpoint
    /// that answers badly yields an empty value instead. The two calls never
    /// block each other.
    async fn fetch_risk_data(&self, code: &str)
        -> (Option<Snapshot>, Option<Vec<Announcement>>);

    /// Company profile, shareholder lists and financial indicators, each
    /// fetched in its own failure-isolated unit.
    async fn fetch_extra_details(&self, code: &str) -> ExtraDetails;
}
