//! Related tools

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use tower_mcp::{
    CallToolResult, Tool, ToolBuilder, ToolError,
    extract::{Json, State},
};

use crate::catalog::related_tools;
use crate::state::AppState;

/// Input for finding related tools
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RelatedInput {
    /// Tool id to find neighbours for
    id: String,
    /// Maximum number of related tools (default: 5, max: 20)
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    5
}

pub fn build(state: Arc<AppState>) -> Tool {
    ToolBuilder::new("related_tools")
        .description(
            "Find tools related to a given tool, ranked by shared keywords, \
             shared integrations (worksWith), and matching category and type.",
        )
        .read_only()
        .idempotent()
        .extractor_handler(
            state,
            |State(state): State<Arc<AppState>>, Json(input): Json<RelatedInput>| async move {
                let id = input.id.trim();
                let related = related_tools(&state.store, id, input.limit.clamp(1, 20))
                    .ok_or_else(|| ToolError::new(format!("Tool '{}' not found", id)))?;

                if related.is_empty() {
                    return Ok(CallToolResult::text(format!(
                        "No related tools found for '{}'.",
                        id
                    )));
                }

                let mut output = format!("# Related to {}\n\n", id);
                for rel in &related {
                    output.push_str(&format!(
                        "- **{}** (`{}`): {}, {} (score {})\n",
                        rel.record.name,
                        rel.record.id,
                        rel.record.category.label(),
                        rel.record.tool_type.label(),
                        rel.score
                    ));
                }
                Ok(CallToolResult::text(output))
            },
        )
        .build()
}
