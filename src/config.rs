//! Search pipeline tuning.

use std::time::Duration;

/// Minimum settled query length (in characters) that switches to AI search.
pub const DEFAULT_AI_THRESHOLD: usize = 15;
/// Quiet period before a typed query is considered settled.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Client-side limit on a single AI relevance call.
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(12);
/// Tools per page in paged mode.
pub const DEFAULT_PAGE_SIZE: usize = 9;
/// Tools shown before the first "load more" in incremental mode.
pub const DEFAULT_INITIAL_REVEAL: usize = 18;
/// Tools added by each "load more".
pub const DEFAULT_REVEAL_STEP: usize = 9;
/// How long a view/vote snapshot is reused before it is fetched again.
pub const DEFAULT_COUNTS_MAX_AGE: Duration = Duration::from_secs(60);
/// Distinct AI queries remembered for analytics de-duplication.
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 1024;
/// How long a reported query stays remembered.
pub const DEFAULT_QUERY_LOG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Tuning knobs shared by the search session and the MCP tools.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub ai_threshold: usize,
    pub debounce: Duration,
    pub ai_timeout: Duration,
    pub page_size: usize,
    pub initial_reveal: usize,
    pub reveal_step: usize,
    pub counts_max_age: Duration,
    pub query_log_capacity: usize,
    pub query_log_ttl: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ai_threshold: DEFAULT_AI_THRESHOLD,
            debounce: DEFAULT_DEBOUNCE,
            ai_timeout: DEFAULT_AI_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            initial_reveal: DEFAULT_INITIAL_REVEAL,
            reveal_step: DEFAULT_REVEAL_STEP,
            counts_max_age: DEFAULT_COUNTS_MAX_AGE,
            query_log_capacity: DEFAULT_QUERY_LOG_CAPACITY,
            query_log_ttl: DEFAULT_QUERY_LOG_TTL,
        }
    }
}
