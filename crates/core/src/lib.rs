pub mod domain;
pub mod format;
pub mod index;
pub mod ingest;
pub mod risk;
pub mod text;

pub mod config {
    use std::time::Duration;

    const DEFAULT_STOCK_LIST_URL: &str = "https://push2.eastmoney.com/api/qt/clist/get";
    const DEFAULT_STOCK_DETAIL_URL: &str = "https://push2.eastmoney.com/api/qt/stock/get";
    const DEFAULT_ANNOUNCEMENT_URL: &str =
        "https://np-anotice-stock.eastmoney.com/api/security/ann";
    const DEFAULT_F10_BASE_URL: &str = "https://emweb.securities.eastmoney.com/PC_HSF10";
    const DEFAULT_DATACENTER_BASE_URL: &str = "https://datacenter.eastmoney.com";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub stock_list_url: String,
        pub stock_detail_url: String,
        pub announcement_url: String,
        pub f10_base_url: String,
        pub datacenter_base_url: String,

        pub request_timeout_secs: u64,

        /// Announcement page size requested from the vendor.
        pub announcement_limit: usize,
        pub search_limit: usize,
        pub pb_warning_threshold: f64,

        /// More announcements than this within one page is read as unusually
        /// chatty disclosure.
        pub high_frequency_threshold: usize,

        /// Seconds before the in-memory symbol index is reloaded; 0 keeps it
        /// for the process lifetime.
        pub index_cache_ttl_secs: u64,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                stock_list_url: DEFAULT_STOCK_LIST_URL.to_string(),
                stock_detail_url: DEFAULT_STOCK_DETAIL_URL.to_string(),
                announcement_url: DEFAULT_ANNOUNCEMENT_URL.to_string(),
                f10_base_url: DEFAULT_F10_BASE_URL.to_string(),
                datacenter_base_url: DEFAULT_DATACENTER_BASE_URL.to_string(),
                request_timeout_secs: 10,
                announcement_limit: 50,
                search_limit: 200,
                pb_warning_threshold: 8.0,
                high_frequency_threshold: 40,
                index_cache_ttl_secs: 600,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> Self {
            let mut out = Self::default();

            for (var, slot) in [
                ("EASTMONEY_STOCK_LIST_URL", &mut out.stock_list_url),
                ("EASTMONEY_STOCK_DETAIL_URL", &mut out.stock_detail_url),
                ("EASTMONEY_ANNOUNCEMENT_URL", &mut out.announcement_url),
                ("EASTMONEY_F10_BASE_URL", &mut out.f10_base_url),
                ("EASTMONEY_DATACENTER_BASE_URL", &mut out.datacenter_base_url),
            ] {
                if let Ok(s) = std::env::var(var) {
                    if !s.trim().is_empty() {
                        *slot = s;
                    }
                }
            }

            if let Some(n) = env_parse::<u64>("RISKLENS_REQUEST_TIMEOUT_SECS") {
                out.request_timeout_secs = n;
            }
            if let Some(n) = env_parse::<usize>("RISKLENS_ANNOUNCEMENT_LIMIT") {
                out.announcement_limit = n;
            }
            if let Some(n) = env_parse::<usize>("RISKLENS_SEARCH_LIMIT") {
                out.search_limit = n;
            }
            if let Some(n) = env_parse::<f64>("RISKLENS_PB_WARNING_THRESHOLD") {
                out.pb_warning_threshold = n;
            }
            if let Some(n) = env_parse::<usize>("RISKLENS_HIGH_FREQUENCY_THRESHOLD") {
                out.high_frequency_threshold = n;
            }
            if let Some(n) = env_parse::<u64>("RISKLENS_INDEX_CACHE_TTL_SECS") {
                out.index_cache_ttl_secs = n;
            }

            out
        }

        pub fn request_timeout(&self) -> Duration {
            Duration::from_secs(self.request_timeout_secs)
        }

        pub fn index_cache_ttl(&self) -> Option<Duration> {
            if self.index_cache_ttl_secs == 0 {
                None
            } else {
                Some(Duration::from_secs(self.index_cache_ttl_secs))
            }
        }
    }

    fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
        std::env::var(var).ok().and_then(|s| s.parse::<T>().ok())
    }
}
