//! Public data types for the site API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One tool the AI relevance service considers a match for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMatch {
    pub tool_id: String,
    /// Relevance confidence, 0 to 100.
    pub confidence: f64,
    /// Short explanation of why the tool matches.
    #[serde(default)]
    pub relevance: String,
}

/// Per-tool counter values keyed by tool id.
pub type CountMap = HashMap<String, u64>;
