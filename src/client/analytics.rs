//! Fire-and-forget analytics events.

use std::sync::Arc;

use serde::Serialize;

use super::SiteClient;
use super::error::Error;

/// An interaction worth counting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// A distinct settled search query.
    Search {
        query: String,
        mode: String,
        results: usize,
    },
    /// A tool detail was opened.
    ToolView {
        #[serde(rename = "toolId")]
        tool_id: String,
    },
    /// A vote was cast.
    Vote {
        #[serde(rename = "toolId")]
        tool_id: String,
    },
}

impl SiteClient {
    /// Deliver one analytics event and wait for the result.
    pub async fn send_event(&self, event: &AnalyticsEvent) -> Result<(), Error> {
        self.post_json_ok("/analytics", event).await
    }

    /// Emit an analytics event in the background.
    ///
    /// Never blocks the caller; delivery failures are only logged.
    pub fn track(self: &Arc<Self>, event: AnalyticsEvent) {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = client.send_event(&event).await {
                tracing::debug!(error = %e, ?event, "Analytics event dropped");
            }
        });
    }
}
