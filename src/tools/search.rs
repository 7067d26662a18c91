//! Hybrid tool search

use std::sync::Arc;

use reqwest::Url;
use schemars::JsonSchema;
use serde::Deserialize;
use tower_mcp::{
    CallToolResult, Tool, ToolBuilder, ToolError,
    extract::{Json, State},
};

use crate::catalog::{Category, ToolType};
use crate::client::AnalyticsEvent;
use crate::search::{AiResults, FilterState, Outcome, Paged, SearchMode, SortOrder, compose};
use crate::state::{AppState, format_number};

/// Largest page size a caller may ask for.
const MAX_PER_PAGE: usize = 50;

/// Input for searching the tool directory
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Search text. Short queries match names, descriptions, and authors;
    /// longer natural-language questions are ranked by AI relevance.
    #[serde(default)]
    query: Option<String>,
    /// Category slug (e.g. "reporting", "security", "automation")
    #[serde(default)]
    category: Option<String>,
    /// Tool type slug (e.g. "script", "web-app", "cli-tool")
    #[serde(default, rename = "type")]
    tool_type: Option<String>,
    /// Sort order: alphabetical (default), popular, most-voted, newest.
    /// Ignored for AI-ranked results.
    #[serde(default)]
    sort: Option<String>,
    /// Page number (default: 1)
    #[serde(default = "default_page")]
    page: usize,
    /// Results per page (default: 9, max: 50)
    #[serde(default)]
    per_page: Option<usize>,
    /// A shared filter link. Its filters apply first; explicit fields override them.
    #[serde(default)]
    share_url: Option<String>,
}

fn default_page() -> usize {
    1
}

impl SearchInput {
    fn into_filters(self) -> Result<FilterState, ToolError> {
        let mut filters = match &self.share_url {
            Some(link) => {
                let url = Url::parse(link)
                    .map_err(|e| ToolError::new(format!("Invalid share_url '{link}': {e}")))?;
                FilterState::from_url(&url)
            }
            None => FilterState::default(),
        };

        if let Some(query) = self.query {
            filters.query = query;
        }
        if let Some(category) = self.category.filter(|c| !c.trim().is_empty()) {
            filters.category = Some(Category::from(category.trim()));
        }
        if let Some(tool_type) = self.tool_type.filter(|t| !t.trim().is_empty()) {
            filters.tool_type = Some(ToolType::from(tool_type.trim()));
        }
        if let Some(sort) = &self.sort {
            filters.sort = SortOrder::from_param(sort).ok_or_else(|| {
                ToolError::new(format!(
                    "Unknown sort '{sort}'. Use one of: {}",
                    SortOrder::ALL.map(|s| s.as_param()).join(", ")
                ))
            })?;
        }
        Ok(filters)
    }
}

pub fn build(state: Arc<AppState>) -> Tool {
    ToolBuilder::new("search_tools")
        .description(
            "Search the tool directory. Short queries are keyword matches over \
             names, descriptions, and authors; questions of 15 or more characters \
             are ranked by AI relevance with a confidence score. Filter by category \
             and type, sort, and page through results. Returns a shareable link.",
        )
        .read_only()
        .idempotent()
        .extractor_handler(
            state,
            |State(state): State<Arc<AppState>>, Json(input): Json<SearchInput>| async move {
                let page = input.page;
                let per_page = input
                    .per_page
                    .unwrap_or(state.config.page_size)
                    .clamp(1, MAX_PER_PAGE);
                let filters = input.into_filters()?;
                let query = filters.query.trim().to_string();
                let mode = SearchMode::for_query(&query, state.config.ai_threshold);

                let counts_fetch = state
                    .counts
                    .current(&state.client, state.config.counts_max_age);
                let (counts, matches) = match mode {
                    SearchMode::Keyword => (counts_fetch.await, None),
                    SearchMode::Ai => {
                        let (counts, ai) =
                            tokio::join!(counts_fetch, state.client.relevance(&query));
                        let matches = ai
                            .inspect_err(|e| {
                                tracing::warn!(%query, error = %e, "AI search unavailable");
                            })
                            .ok();
                        (counts, Some(matches))
                    }
                };

                let ai = match &matches {
                    Some(Some(found)) => AiResults::Ready(found),
                    Some(None) => AiResults::Failed,
                    None => AiResults::Pending,
                };
                let composition = compose(
                    &state.store,
                    &filters,
                    ai,
                    &counts,
                    state.config.ai_threshold,
                );

                let answered = matches!(matches, Some(Some(_)));
                if answered && state.first_search(&query).await {
                    state.client.track(AnalyticsEvent::Search {
                        query: query.clone(),
                        mode: mode.as_str().to_string(),
                        results: composition.len(),
                    });
                }

                let share = filters.to_url(&state.site_url);
                let heading = if query.is_empty() {
                    "# Tool directory\n\n".to_string()
                } else {
                    format!("# Search: \"{}\"\n\n", query)
                };
                let mut output = heading;

                match composition.outcome {
                    Outcome::AiUnavailable => {
                        output.push_str(
                            "AI search is unavailable right now. \
                             Try a shorter keyword query.\n\n",
                        );
                        output.push_str(&format!("**Share:** {}\n", share));
                        return Ok(CallToolResult::text(output));
                    }
                    Outcome::NoResults | Outcome::Loading => {
                        output.push_str("No tools match these filters.\n\n");
                        output.push_str(&format!("**Share:** {}\n", share));
                        return Ok(CallToolResult::text(output));
                    }
                    Outcome::Results => {}
                }

                let paged = Paged::new(per_page).page(&composition.hits, page);
                let ranking = match mode {
                    SearchMode::Ai => "AI relevance".to_string(),
                    SearchMode::Keyword => filters.sort.label().to_string(),
                };
                output.push_str(&format!(
                    "Found {} tools, page {} of {} (sorted by {})\n\n",
                    paged.total_items, paged.number, paged.total_pages, ranking
                ));

                for (offset, hit) in paged.items.iter().enumerate() {
                    let r = hit.record;
                    output.push_str(&format!(
                        "## {}. {} (`{}`)\n",
                        paged.start + offset + 1,
                        r.name,
                        r.id
                    ));
                    output.push_str(&format!(
                        "**Category:** {} | **Type:** {} | **By:** {}\n",
                        r.category.label(),
                        r.tool_type.label(),
                        r.author_names()
                    ));
                    if let Some(confidence) = hit.confidence {
                        output.push_str(&format!("**Confidence:** {:.0}%", confidence));
                        match hit.relevance.filter(|why| !why.is_empty()) {
                            Some(why) => output.push_str(&format!(" ({})\n", why)),
                            None => output.push('\n'),
                        }
                    }
                    output.push_str(&format!(
                        "**Views:** {} | **Votes:** {}\n",
                        format_number(counts.views(&r.id)),
                        format_number(counts.votes(&r.id))
                    ));
                    if !r.description.is_empty() {
                        output.push_str(&format!("{}\n", r.description.trim()));
                    }
                    output.push('\n');
                }

                if paged.has_next() {
                    output.push_str(&format!(
                        "_More results: request page {}._\n",
                        paged.number + 1
                    ));
                }
                output.push_str(&format!("**Share:** {}\n", share));

                Ok(CallToolResult::text(output))
            },
        )
        .build()
}
