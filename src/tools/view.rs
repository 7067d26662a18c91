//! Record a tool view

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use tower_mcp::{
    CallToolResult, ResultExt, Tool, ToolBuilder, ToolError,
    extract::{Json, State},
};

use crate::client::AnalyticsEvent;
use crate::state::AppState;

/// Input for recording a view
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ViewInput {
    /// Tool id that was viewed
    id: String,
}

pub fn build(state: Arc<AppState>) -> Tool {
    ToolBuilder::new("record_view")
        .description("Record that a tool's detail page was viewed and return its view count.")
        .extractor_handler(
            state,
            |State(state): State<Arc<AppState>>, Json(input): Json<ViewInput>| async move {
                let id = input.id.trim();
                let record = state
                    .store
                    .get(id)
                    .ok_or_else(|| ToolError::new(format!("Tool '{}' not found", id)))?;

                let views = state
                    .counts
                    .record_view(&state.client, &record.id)
                    .await
                    .tool_context("View counter error")?;
                state.client.track(AnalyticsEvent::ToolView {
                    tool_id: record.id.clone(),
                });

                Ok(CallToolResult::text(format!(
                    "Recorded a view of **{}**. Views: {}",
                    record.name, views
                )))
            },
        )
        .build()
}
