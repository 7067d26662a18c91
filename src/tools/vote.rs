//! Vote for a tool

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use tower_mcp::{
    CallToolResult, ResultExt, Tool, ToolBuilder, ToolError,
    extract::{Json, State},
};

use crate::client::AnalyticsEvent;
use crate::search::VoteOutcome;
use crate::state::AppState;

/// Input for voting
#[derive(Debug, Deserialize, JsonSchema)]
pub struct VoteInput {
    /// Tool id to vote for
    id: String,
    /// Stable identifier of the voter; each voter counts once per tool
    voter: String,
}

pub fn build(state: Arc<AppState>) -> Tool {
    ToolBuilder::new("vote_tool")
        .description(
            "Upvote a tool. Each voter can vote once per tool; repeating a vote \
             returns the current count without counting again.",
        )
        .idempotent()
        .extractor_handler(
            state,
            |State(state): State<Arc<AppState>>, Json(input): Json<VoteInput>| async move {
                let id = input.id.trim();
                let voter = input.voter.trim();
                if voter.is_empty() {
                    return Err(ToolError::new("voter must not be empty".to_string()).into());
                }
                let record = state
                    .store
                    .get(id)
                    .ok_or_else(|| ToolError::new(format!("Tool '{}' not found", id)))?;

                let outcome = state
                    .counts
                    .vote(&state.client, &record.id, voter)
                    .await
                    .tool_context("Vote service error")?;

                let output = match outcome {
                    VoteOutcome::Counted(votes) => {
                        state.client.track(AnalyticsEvent::Vote {
                            tool_id: record.id.clone(),
                        });
                        format!("Vote recorded for **{}**. Votes: {}", record.name, votes)
                    }
                    VoteOutcome::AlreadyVoted(votes) => format!(
                        "Already voted for **{}**. Votes: {}",
                        record.name, votes
                    ),
                };
                Ok(CallToolResult::text(output))
            },
        )
        .build()
}
