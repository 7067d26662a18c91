//! Hybrid keyword / AI result composition.
//!
//! The search mode is derived from the query on every call; it is never
//! stored. Short queries are keyword lookups, long ones are treated as
//! natural-language questions and ranked by the AI relevance service.

use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

use crate::catalog::{ToolRecord, ToolStore};
use crate::client::AiMatch;

use super::counts::Counts;
use super::filter::keyword_filter;
use super::sort::sort_records;
use super::state::FilterState;

/// Which path produces the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Keyword,
    Ai,
}

impl SearchMode {
    /// AI mode iff the trimmed query is non-empty and at least `threshold`
    /// characters long.
    pub fn for_query(query: &str, threshold: usize) -> Self {
        let query = query.trim();
        if !query.is_empty() && query.chars().count() >= threshold {
            SearchMode::Ai
        } else {
            SearchMode::Keyword
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "keyword",
            SearchMode::Ai => "ai",
        }
    }
}

/// State of the AI result set for the current query.
#[derive(Debug, Clone, Copy)]
pub enum AiResults<'a> {
    /// The lookup has not completed yet.
    Pending,
    /// The lookup failed; the AI path shows nothing until the query changes.
    Failed,
    Ready(&'a [AiMatch]),
}

/// How the composed list should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Results,
    /// A completed search that matched nothing.
    NoResults,
    /// AI lookup still in flight.
    Loading,
    /// AI lookup failed; degraded to an empty list.
    AiUnavailable,
}

/// A record in the composed list, with AI annotations in AI mode.
#[derive(Debug, Clone)]
pub struct Hit<'a> {
    pub record: &'a ToolRecord,
    pub confidence: Option<f64>,
    pub relevance: Option<&'a str>,
}

/// The filtered, ranked result list for one state.
#[derive(Debug, Clone)]
pub struct Composition<'a> {
    pub mode: SearchMode,
    pub hits: Vec<Hit<'a>>,
    pub outcome: Outcome,
}

impl Composition<'_> {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Compose the result list for `state`.
///
/// `ai` is only consulted in AI mode. AI matches referencing unknown tool ids
/// are dropped, and a tool listed twice keeps its first entry.
pub fn compose<'a>(
    store: &'a ToolStore,
    state: &FilterState,
    ai: AiResults<'a>,
    counts: &Counts,
    threshold: usize,
) -> Composition<'a> {
    let mode = SearchMode::for_query(&state.query, threshold);
    match mode {
        SearchMode::Keyword => {
            let mut records = keyword_filter(store.all(), &state.criteria());
            sort_records(&mut records, state.sort, counts);
            let hits: Vec<Hit<'a>> = records
                .into_iter()
                .map(|record| Hit {
                    record,
                    confidence: None,
                    relevance: None,
                })
                .collect();
            let outcome = if hits.is_empty() {
                Outcome::NoResults
            } else {
                Outcome::Results
            };
            Composition {
                mode,
                hits,
                outcome,
            }
        }
        SearchMode::Ai => {
            let matches = match ai {
                AiResults::Pending => {
                    return Composition {
                        mode,
                        hits: Vec::new(),
                        outcome: Outcome::Loading,
                    };
                }
                AiResults::Failed => {
                    return Composition {
                        mode,
                        hits: Vec::new(),
                        outcome: Outcome::AiUnavailable,
                    };
                }
                AiResults::Ready(matches) => matches,
            };

            let criteria = state.criteria();
            let mut seen = HashSet::new();
            let mut hits: Vec<Hit<'a>> = matches
                .iter()
                .filter(|m| seen.insert(m.tool_id.as_str()))
                .filter_map(|m| {
                    let record = store.get(&m.tool_id)?;
                    criteria.matches_facets(record).then_some(Hit {
                        record,
                        confidence: Some(m.confidence),
                        relevance: Some(m.relevance.as_str()),
                    })
                })
                .collect();
            hits.sort_by(|a, b| rank_ai(a, b, counts));

            let outcome = if hits.is_empty() {
                Outcome::NoResults
            } else {
                Outcome::Results
            };
            Composition {
                mode,
                hits,
                outcome,
            }
        }
    }
}

/// Confidence descending, then views descending.
fn rank_ai(a: &Hit<'_>, b: &Hit<'_>, counts: &Counts) -> Ordering {
    let ca = a.confidence.unwrap_or(0.0);
    let cb = b.confidence.unwrap_or(0.0);
    cb.total_cmp(&ca).then_with(|| {
        Reverse(counts.views(&a.record.id)).cmp(&Reverse(counts.views(&b.record.id)))
    })
}
