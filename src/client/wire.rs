//! Internal wire types for serde (de)serialization.
//!
//! These types match the raw JSON structure of the site API
//! and are not exposed publicly.

use serde::{Deserialize, Serialize};

use super::types::{AiMatch, CountMap};

// ── AI search ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub(crate) struct AiSearchRequest<'a> {
    pub query: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct AiSearchResponse {
    pub results: Vec<AiMatch>,
}

// ── Counters ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct CountsResponse {
    pub counts: CountMap,
}

#[derive(Deserialize)]
pub(crate) struct ViewResponse {
    pub views: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoteRequest<'a> {
    pub voter_id: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct VoteResponse {
    pub votes: u64,
}
