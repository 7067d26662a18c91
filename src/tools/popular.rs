//! Most-starred tools

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use tower_mcp::{
    CallToolResult, Tool, ToolBuilder,
    extract::{Json, State},
};

use crate::state::{AppState, format_number};

/// Input for listing popular tools
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PopularInput {
    /// Number of tools to return (default: 10, max: 50)
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

pub fn build(state: Arc<AppState>) -> Tool {
    ToolBuilder::new("popular_tools")
        .description(
            "List the tools with the most GitHub stars (forks break ties). \
             Only tools with repository stats are included.",
        )
        .read_only()
        .idempotent()
        .extractor_handler(
            state,
            |State(state): State<Arc<AppState>>, Json(input): Json<PopularInput>| async move {
                let ranked = state.store.most_popular(input.limit.clamp(1, 50));
                if ranked.is_empty() {
                    return Ok(CallToolResult::text(
                        "No tools have repository stats yet.".to_string(),
                    ));
                }

                let mut output = format!("# Popular tools (top {})\n\n", ranked.len());
                for (i, r) in ranked.iter().enumerate() {
                    let stats = r.repo_stats.unwrap_or_default();
                    output.push_str(&format!(
                        "{}. **{}** (`{}`): {} stars, {} forks\n",
                        i + 1,
                        r.name,
                        r.id,
                        format_number(stats.stars),
                        format_number(stats.forks)
                    ));
                }
                Ok(CallToolResult::text(output))
            },
        )
        .build()
}
