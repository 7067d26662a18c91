//! AI relevance search endpoint.

use super::SiteClient;
use super::error::Error;
use super::types::AiMatch;
use super::wire::{AiSearchRequest, AiSearchResponse};

impl SiteClient {
    /// Ask the relevance service which tools answer a natural-language query.
    ///
    /// The response is validated as a whole: one bad entry (empty tool id,
    /// confidence outside 0..=100) rejects the entire result set.
    pub async fn relevance(&self, query: &str) -> Result<Vec<AiMatch>, Error> {
        let resp: AiSearchResponse = self
            .post_json("/ai-search", &AiSearchRequest { query })
            .await?;

        for m in &resp.results {
            if m.tool_id.trim().is_empty() {
                return Err(Error::Malformed("result without toolId".into()));
            }
            if !m.confidence.is_finite() || !(0.0..=100.0).contains(&m.confidence) {
                return Err(Error::Malformed(format!(
                    "confidence {} for {} is outside 0-100",
                    m.confidence, m.tool_id
                )));
            }
        }
        Ok(resp.results)
    }
}
