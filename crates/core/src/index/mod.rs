use crate::config::Settings;
use crate::ingest::provider::MarketDataProvider;
use crate::ingest::types::SymbolRecord;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Similarity-ratio floor for the fuzzy tier.
const FUZZY_CUTOFF: f64 = 0.6;

struct CachedIndex {
    records: Arc<Vec<SymbolRecord>>,
    loaded_at: Instant,
}

/// Process-wide tradable-symbol index with tiered search.
///
/// The record collection is immutable once loaded; a rebuild swaps the whole
/// `Arc` so in-flight readers keep a consistent view. Search results are
/// cached per (query, index size, limit).
pub struct StockIndex {
    provider: Arc<dyn MarketDataProvider>,
    ttl: Option<Duration>,
    index: RwLock<Option<CachedIndex>>,
    search_cache: RwLock<HashMap<String, Arc<Vec<SymbolRecord>>>>,
}

impl StockIndex {
    pub fn new(provider: Arc<dyn MarketDataProvider>, ttl: Option<Duration>) -> Self {
        Self {
            provider,
            ttl,
            index: RwLock::new(None),
            search_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_settings(provider: Arc<dyn MarketDataProvider>, settings: &Settings) -> Self {
        Self::new(provider, settings.index_cache_ttl())
    }

    /// The full universe, fetching on first use and after TTL expiry. A
    /// failed or empty fetch yields an empty universe and is not cached, so
    /// the next call gets another attempt at the vendor.
    pub async fn load_full_index(&self) -> Arc<Vec<SymbolRecord>> {
        if let Some(records) = self.cached_records() {
            return records;
        }

        let fetched = match self.provider.fetch_symbol_index().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    error = %err,
                    "symbol index fetch failed"
                );
                return Arc::new(Vec::new());
            }
        };
        if fetched.is_empty() {
            return Arc::new(Vec::new());
        }

        let records = Arc::new(fetched);
        let mut guard = self.index.write().expect("index lock poisoned");
        *guard = Some(CachedIndex {
            records: Arc::clone(&records),
            loaded_at: Instant::now(),
        });
        records
    }

    /// Tiered lookup: prefix, then substring over the search key, then
    /// similarity ratio against names and symbols. The first non-empty tier
    /// wins; tiers are never merged. A blank query browses the head of the
    /// index.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<SymbolRecord> {
        let records = self.load_full_index().await;
        let q = query.trim().to_lowercase();

        if records.is_empty() || q.is_empty() {
            return records.iter().take(limit).cloned().collect();
        }

        let cache_key = format!("{}::{}::{}", q, records.len(), limit);
        if let Some(hit) = self
            .search_cache
            .read()
            .expect("search cache lock poisoned")
            .get(&cache_key)
        {
            return hit.as_ref().clone();
        }

        let result = search_tiers(&records, query.trim(), &q, limit);
        if !result.is_empty() {
            self.search_cache
                .write()
                .expect("search cache lock poisoned")
                .insert(cache_key, Arc::new(result.clone()));
        }
        result
    }

    /// Same-industry records for the peer-comparison table, excluding the
    /// ticker under review.
    pub async fn peers_by_industry(
        &self,
        industry: &str,
        exclude_code: &str,
        limit: usize,
    ) -> Vec<SymbolRecord> {
        if industry.trim().is_empty() {
            return Vec::new();
        }

        let records = self.load_full_index().await;
        records
            .iter()
            .filter(|r| r.industry == industry && r.symbol != exclude_code)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Drops the cached universe and all cached search results; the next
    /// call reloads from the vendor.
    pub fn invalidate(&self) {
        *self.index.write().expect("index lock poisoned") = None;
        self.search_cache
            .write()
            .expect("search cache lock poisoned")
            .clear();
    }

    fn cached_records(&self) -> Option<Arc<Vec<SymbolRecord>>> {
        let guard = self.index.read().expect("index lock poisoned");
        let cached = guard.as_ref()?;
        if let Some(ttl) = self.ttl {
            if cached.loaded_at.elapsed() >= ttl {
                return None;
            }
        }
        Some(Arc::clone(&cached.records))
    }
}

fn search_tiers(
    records: &[SymbolRecord],
    raw_query: &str,
    q: &str,
    limit: usize,
) -> Vec<SymbolRecord> {
    let prefix: Vec<SymbolRecord> = records
        .iter()
        .filter(|r| {
            r.symbol.to_lowercase().starts_with(q) || r.name.to_lowercase().starts_with(q)
        })
        .take(limit)
        .cloned()
        .collect();
    if !prefix.is_empty() {
        return prefix;
    }

    let contains: Vec<SymbolRecord> = records
        .iter()
        .filter(|r| r.search_key.contains(q))
        .take(limit)
        .cloned()
        .collect();
    if !contains.is_empty() {
        return contains;
    }

    // Fuzzy tier: name-list and symbol-list matches, unioned in index order.
    records
        .iter()
        .filter(|r| {
            strsim::normalized_levenshtein(raw_query, &r.name) >= FUZZY_CUTOFF
                || strsim::normalized_levenshtein(raw_query, &r.symbol) >= FUZZY_CUTOFF
        })
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{Announcement, ExtraDetails, Snapshot};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        records: Vec<SymbolRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn with_records(records: Vec<SymbolRecord>) -> Arc<Self> {
            Arc::new(Self {
                records,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                records: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl MarketDataProvider for StubProvider {
        fn provider_name(&self) -> &'static str {
            "stub"
        }

        async fn fetch_symbol_index(&self) -> anyhow::Result<Vec<SymbolRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("stub offline");
            }
            Ok(self.records.clone())
        }

        async fn fetch_risk_data(
            &self,
            _code: &str,
        ) -> (Option<Snapshot>, Option<Vec<Announcement>>) {
            (None, None)
        }

        async fn fetch_extra_details(&self, _code: &str) -> ExtraDetails {
            ExtraDetails::default()
        }
    }

    fn universe() -> Vec<SymbolRecord> {
        vec![
            SymbolRecord::new("600519", "贵州茅台", "白酒"),
            SymbolRecord::new("600520", "文一科技", "半导体"),
            SymbolRecord::new("000858", "五粮液", "白酒"),
            SymbolRecord::new("002594", "比亚迪", "汽车整车"),
        ]
    }

    #[tokio::test]
    async fn prefix_tier_wins_and_is_never_merged_with_lower_tiers() {
        let index = StockIndex::new(StubProvider::with_records(universe()), None);

        let hits = index.search("6005", 50).await;
        let symbols: Vec<&str> = hits.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["600519", "600520"]);
    }

    #[tokio::test]
    async fn substring_tier_catches_name_infix() {
        let index = StockIndex::new(StubProvider::with_records(universe()), None);

        let hits = index.search("茅台", 50).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol, "600519");
    }

    #[tokio::test]
    async fn fuzzy_tier_unions_symbol_and_name_candidates() {
        let index = StockIndex::new(StubProvider::with_records(universe()), None);

        // One digit off from 600519: no prefix, no substring, high ratio.
        let hits = index.search("600518", 50).await;
        assert!(hits.iter().any(|r| r.symbol == "600519"));
        assert!(hits.iter().all(|r| r.symbol.starts_with("600")));
    }

    #[tokio::test]
    async fn blank_query_browses_the_head_of_the_index() {
        let index = StockIndex::new(StubProvider::with_records(universe()), None);

        let hits = index.search("   ", 2).await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].symbol, "600519");
    }

    #[tokio::test]
    async fn limit_caps_every_tier() {
        let index = StockIndex::new(StubProvider::with_records(universe()), None);
        assert_eq!(index.search("6005", 1).await.len(), 1);
        assert_eq!(index.search("", 3).await.len(), 3);
    }

    #[tokio::test]
    async fn index_is_fetched_once_and_reused() {
        let provider = StubProvider::with_records(universe());
        let index = StockIndex::new(provider.clone(), None);

        index.load_full_index().await;
        index.search("茅台", 10).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_reload() {
        let provider = StubProvider::with_records(universe());
        let index = StockIndex::new(provider.clone(), None);

        index.load_full_index().await;
        index.invalidate();
        index.load_full_index().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_empty_and_is_not_cached() {
        let provider = StubProvider::failing();
        let index = StockIndex::new(provider.clone(), None);

        assert!(index.load_full_index().await.is_empty());
        assert!(index.search("600519", 10).await.is_empty());
        // Both calls hit the provider again: failures are never cached.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn peers_share_industry_and_exclude_the_target() {
        let index = StockIndex::new(StubProvider::with_records(universe()), None);

        let peers = index.peers_by_industry("白酒", "600519", 5).await;
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].symbol, "000858");

        assert!(index.peers_by_industry("", "600519", 5).await.is_empty());
    }

    #[tokio::test]
    async fn expired_ttl_triggers_a_reload() {
        let provider = StubProvider::with_records(universe());
        let index = StockIndex::new(provider.clone(), Some(Duration::from_secs(0)));

        index.load_full_index().await;
        index.load_full_index().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}
