//! One user's interactive search.
//!
//! A session owns the filter state, the AI result cache for the current
//! query, the latest counter snapshot, and the incremental reveal window.
//! Settled queries arrive from a [`Debouncer`]; everything else is applied
//! synchronously.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Url;

use crate::catalog::{Category, ToolStore, ToolType};
use crate::client::{AiMatch, AnalyticsEvent, SiteClient};
use crate::config::SearchConfig;

use super::ai::{AiLookup, AiSearch, PendingLookup};
use super::compose::{AiResults, Composition, Hit, Outcome, SearchMode, compose};
use super::counts::{Counts, CountsTracker};
use super::debounce::Debouncer;
use super::paginate::{IncrementalReveal, Paged};
use super::query_log::QueryLog;
use super::sort::SortOrder;
use super::state::{FilterState, ViewMode};

/// AI results held for the current query.
#[derive(Debug, Clone, Default)]
enum AiCache {
    #[default]
    Idle,
    Pending(String),
    Ready { query: String, matches: Vec<AiMatch> },
    Failed(String),
}

impl AiCache {
    fn query(&self) -> Option<&str> {
        match self {
            AiCache::Idle => None,
            AiCache::Pending(q) | AiCache::Failed(q) | AiCache::Ready { query: q, .. } => {
                Some(q.as_str())
            }
        }
    }

    fn results(&self) -> AiResults<'_> {
        match self {
            AiCache::Idle | AiCache::Pending(_) => AiResults::Pending,
            AiCache::Failed(_) => AiResults::Failed,
            AiCache::Ready { matches, .. } => AiResults::Ready(matches),
        }
    }
}

#[derive(Debug)]
struct Inner {
    filters: FilterState,
    ai: AiCache,
    counts: Counts,
    reveal: IncrementalReveal,
    logged_queries: QueryLog,
}

/// A tool as listed in a result view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedTool {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub tool_type: ToolType,
    pub confidence: Option<f64>,
    pub relevance: Option<String>,
    pub views: u64,
    pub votes: u64,
}

/// What the listing shows in incremental mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub mode: SearchMode,
    pub outcome: Outcome,
    pub tools: Vec<ListedTool>,
    pub total: usize,
    pub has_more: bool,
}

/// What the listing shows in paged mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPage {
    pub mode: SearchMode,
    pub outcome: Outcome,
    pub tools: Vec<ListedTool>,
    pub number: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Interactive search over a shared tool store.
#[derive(Debug)]
pub struct SearchSession {
    store: Arc<ToolStore>,
    client: Arc<SiteClient>,
    counts: Arc<CountsTracker>,
    config: SearchConfig,
    ai: AiSearch,
    inner: Mutex<Inner>,
}

impl SearchSession {
    pub fn new(
        store: Arc<ToolStore>,
        client: Arc<SiteClient>,
        counts: Arc<CountsTracker>,
        config: SearchConfig,
    ) -> Self {
        let inner = Inner {
            filters: FilterState::default(),
            ai: AiCache::Idle,
            counts: Counts::default(),
            reveal: IncrementalReveal::new(config.initial_reveal, config.reveal_step),
            logged_queries: QueryLog::new(config.query_log_capacity, config.query_log_ttl),
        };
        Self {
            store,
            ai: AiSearch::new(Arc::clone(&client)),
            client,
            counts,
            config,
            inner: Mutex::new(inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a debouncer whose settled queries drive this session.
    ///
    /// Settled queries are recorded, and their AI lookups issued, in arrival
    /// order. Only the wait for each lookup runs on its own task, so a newer
    /// query always supersedes an older one.
    pub fn attach(self: &Arc<Self>) -> Debouncer {
        let (debouncer, mut settled) = Debouncer::spawn(self.config.debounce);
        let session = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(query) = settled.recv().await {
                if let Some(pending) = session.settle(&query) {
                    let session = Arc::clone(&session);
                    tokio::spawn(async move { session.complete(pending).await });
                }
            }
        });
        debouncer
    }

    pub fn filters(&self) -> FilterState {
        self.lock().filters.clone()
    }

    /// Current search mode, derived from the query.
    pub fn mode(&self) -> SearchMode {
        SearchMode::for_query(&self.lock().filters.query, self.config.ai_threshold)
    }

    /// Apply a settled query. In AI mode this waits for the relevance
    /// service; the result is dropped if another query arrived meanwhile.
    pub async fn apply_settled_query(&self, query: &str) {
        if let Some(pending) = self.settle(query) {
            self.complete(pending).await;
        }
    }

    /// Record `query` and, if it needs one, issue its AI lookup.
    fn settle(&self, query: &str) -> Option<PendingLookup> {
        let trimmed = query.trim();
        let mut inner = self.lock();
        inner.filters.query = query.to_string();
        if SearchMode::for_query(trimmed, self.config.ai_threshold) == SearchMode::Keyword {
            inner.ai = AiCache::Idle;
            self.ai.cancel();
            return None;
        }
        if inner.ai.query() == Some(trimmed) && !matches!(inner.ai, AiCache::Pending(_)) {
            return None;
        }
        inner.ai = AiCache::Pending(trimmed.to_string());
        Some(self.ai.start(trimmed))
    }

    /// Wait for a lookup and apply it if it is still the current one.
    async fn complete(&self, pending: PendingLookup) {
        let query = pending.query().to_string();
        let lookup = self.ai.finish(pending).await;

        let mut inner = self.lock();
        if inner.filters.query.trim() != query {
            return;
        }
        match lookup {
            AiLookup::Superseded => {}
            AiLookup::Failed => inner.ai = AiCache::Failed(query),
            AiLookup::Ready(matches) => {
                let results = matches.len();
                let first = inner.logged_queries.first_seen(&query);
                inner.ai = AiCache::Ready {
                    query: query.clone(),
                    matches,
                };
                if first {
                    self.client.track(AnalyticsEvent::Search {
                        query,
                        mode: SearchMode::Ai.as_str().to_string(),
                        results,
                    });
                }
            }
        }
    }

    /// Empty the query at once, abandoning any AI lookup.
    pub fn clear_query(&self) {
        let mut inner = self.lock();
        inner.filters.query.clear();
        inner.ai = AiCache::Idle;
        self.ai.cancel();
    }

    /// Reset category, type, sort, and query together.
    pub fn clear_filters(&self) {
        let mut inner = self.lock();
        inner.filters.clear();
        inner.ai = AiCache::Idle;
        self.ai.cancel();
    }

    /// Changing a facet re-filters cached AI results; no new lookup is made.
    pub fn set_category(&self, category: Option<Category>) {
        self.lock().filters.category = category;
    }

    pub fn set_tool_type(&self, tool_type: Option<ToolType>) {
        self.lock().filters.tool_type = tool_type;
    }

    pub fn set_sort(&self, sort: SortOrder) {
        self.lock().filters.sort = sort;
    }

    pub fn set_view(&self, view: ViewMode) {
        self.lock().filters.view = view;
    }

    /// Adopt a full state (for example one read from a shared link), then
    /// settle its query.
    pub async fn restore(&self, filters: FilterState) {
        let query = filters.query.clone();
        {
            let mut inner = self.lock();
            inner.filters = FilterState {
                query: String::new(),
                ..filters
            };
            inner.ai = AiCache::Idle;
        }
        self.apply_settled_query(&query).await;
    }

    /// Shareable link for the current state.
    pub fn share_url(&self, base: &Url) -> Url {
        self.lock().filters.to_url(base)
    }

    /// Fetch fresh counters and keep them for ranking and badges.
    pub async fn refresh_counts(&self) {
        let counts = self.counts.refresh(&self.client).await;
        self.lock().counts = counts;
    }

    /// The incrementally revealed listing.
    pub fn view(&self) -> SessionView {
        let mut inner = self.lock();
        let Inner {
            filters,
            ai,
            counts,
            reveal,
            ..
        } = &mut *inner;
        let composition = self.compose(filters, ai, counts);
        reveal.observe(&filters.fingerprint(), composition.len());
        SessionView {
            mode: composition.mode,
            outcome: composition.outcome,
            tools: listed(reveal.window(&composition.hits), counts),
            total: composition.len(),
            has_more: reveal.has_more(),
        }
    }

    /// Reveal the next batch and return the grown listing.
    pub fn load_more(&self) -> SessionView {
        {
            let mut inner = self.lock();
            let Inner {
                filters,
                ai,
                counts,
                reveal,
                ..
            } = &mut *inner;
            let total = self.compose(filters, ai, counts).len();
            reveal.observe(&filters.fingerprint(), total);
            reveal.load_more();
        }
        self.view()
    }

    /// Page `number` of the listing in paged mode.
    pub fn page(&self, number: usize) -> SessionPage {
        let inner = self.lock();
        let composition = self.compose(&inner.filters, &inner.ai, &inner.counts);
        let page = Paged::new(self.config.page_size).page(&composition.hits, number);
        SessionPage {
            mode: composition.mode,
            outcome: composition.outcome,
            tools: listed(page.items, &inner.counts),
            number: page.number,
            total_pages: page.total_pages,
            total: page.total_items,
        }
    }

    fn compose<'a>(
        &'a self,
        filters: &FilterState,
        ai: &'a AiCache,
        counts: &Counts,
    ) -> Composition<'a> {
        compose(
            &self.store,
            filters,
            ai.results(),
            counts,
            self.config.ai_threshold,
        )
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.ai.cancel();
    }
}

fn listed(hits: &[Hit<'_>], counts: &Counts) -> Vec<ListedTool> {
    hits.iter()
        .map(|hit| ListedTool {
            id: hit.record.id.clone(),
            name: hit.record.name.clone(),
            category: hit.record.category.clone(),
            tool_type: hit.record.tool_type.clone(),
            confidence: hit.confidence,
            relevance: hit.relevance.map(str::to_string),
            views: counts.views(&hit.record.id),
            votes: counts.votes(&hit.record.id),
        })
        .collect()
}
