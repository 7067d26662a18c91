//! List categories and tool types

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use tower_mcp::{
    CallToolResult, Tool, ToolBuilder,
    extract::{Json, State},
};

use crate::state::AppState;

/// Listing tools take no arguments
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListInput {}

pub fn build(state: Arc<AppState>) -> Tool {
    ToolBuilder::new("list_categories")
        .description(
            "List tool categories with the number of tools in each. Use the slug \
             as the `category` filter of search_tools.",
        )
        .read_only()
        .idempotent()
        .extractor_handler(
            state,
            |State(state): State<Arc<AppState>>, Json(_): Json<ListInput>| async move {
                let mut output = format!("# Categories ({} tools)\n\n", state.store.len());
                for (category, count) in state.store.category_counts() {
                    output.push_str(&format!(
                        "- **{}** (`{}`): {} tools\n",
                        category.label(),
                        category.as_str(),
                        count
                    ));
                }
                Ok(CallToolResult::text(output))
            },
        )
        .build()
}

pub fn build_types(state: Arc<AppState>) -> Tool {
    ToolBuilder::new("list_types")
        .description(
            "List tool types (script, web app, CLI tool, ...) with the number of \
             tools of each. Use the slug as the `type` filter of search_tools.",
        )
        .read_only()
        .idempotent()
        .extractor_handler(
            state,
            |State(state): State<Arc<AppState>>, Json(_): Json<ListInput>| async move {
                let mut output = format!("# Tool types ({} tools)\n\n", state.store.len());
                for (tool_type, count) in state.store.type_counts() {
                    output.push_str(&format!(
                        "- **{}** (`{}`): {} tools\n",
                        tool_type.label(),
                        tool_type.as_str(),
                        count
                    ));
                }
                Ok(CallToolResult::text(output))
            },
        )
        .build()
}
