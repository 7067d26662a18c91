//! Shared application state

use std::sync::Arc;

use reqwest::Url;
use tokio::sync::RwLock;

use crate::catalog::ToolStore;
use crate::client::{SiteClient, USER_AGENT};
use crate::config::SearchConfig;
use crate::search::{CountsTracker, QueryLog};

/// Public site address used for shareable links when none is configured.
pub const DEFAULT_SITE_URL: &str = "https://tools.example.com/";

/// Shared state for the MCP server
pub struct AppState {
    /// The tool dataset, read-only after load
    pub store: Arc<ToolStore>,
    /// Site API client (AI relevance, counters, analytics)
    pub client: Arc<SiteClient>,
    /// Cached view/vote counters and per-voter vote sets
    pub counts: CountsTracker,
    /// Search tuning
    pub config: SearchConfig,
    /// Base for shareable filter links
    pub site_url: Url,
    /// AI queries already reported to analytics
    logged_queries: RwLock<QueryLog>,
}

impl AppState {
    /// Create new application state
    ///
    /// # Arguments
    /// * `store` - Loaded tool dataset
    /// * `api_base_url` - Root of the site API
    /// * `api_key` - Optional bearer token for the site API
    /// * `config` - Search tuning; `ai_timeout` bounds every API request
    /// * `site_url` - Base for shareable links
    pub fn new(
        store: ToolStore,
        api_base_url: &str,
        api_key: Option<String>,
        config: SearchConfig,
        site_url: Url,
    ) -> Result<Self, tower_mcp::BoxError> {
        let mut client = SiteClient::new(USER_AGENT, api_base_url, config.ai_timeout)
            .map_err(|e| format!("Failed to create site API client: {e}"))?;
        if let Some(key) = api_key {
            client = client.with_api_key(key);
        }

        let logged_queries = QueryLog::new(config.query_log_capacity, config.query_log_ttl);
        Ok(Self {
            store: Arc::new(store),
            client: Arc::new(client),
            counts: CountsTracker::new(),
            config,
            site_url,
            logged_queries: RwLock::new(logged_queries),
        })
    }

    /// State with default tuning against the given API base URL.
    pub fn with_base_url(store: ToolStore, api_base_url: &str) -> Result<Self, tower_mcp::BoxError> {
        let site_url = Url::parse(DEFAULT_SITE_URL)?;
        Self::new(store, api_base_url, None, SearchConfig::default(), site_url)
    }

    /// Record that `query` was reported to analytics.
    ///
    /// Returns `true` only the first time a given (trimmed) query is seen
    /// within the query log's lifetime and capacity.
    pub async fn first_search(&self, query: &str) -> bool {
        self.logged_queries.write().await.first_seen(query)
    }
}

/// Helper to format large numbers in a human-readable way
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
