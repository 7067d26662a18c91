//! View and vote counter endpoints.

use super::SiteClient;
use super::error::Error;
use super::types::CountMap;
use super::wire::{CountsResponse, ViewResponse, VoteRequest, VoteResponse};

impl SiteClient {
    /// Current view count for every tool that has one.
    pub async fn view_counts(&self) -> Result<CountMap, Error> {
        let resp: CountsResponse = self.get_json("/views").await?;
        Ok(resp.counts)
    }

    /// Current vote count for every tool that has one.
    pub async fn vote_counts(&self) -> Result<CountMap, Error> {
        let resp: CountsResponse = self.get_json("/votes").await?;
        Ok(resp.counts)
    }

    /// Record one view of a tool. Returns the new view count.
    pub async fn record_view(&self, tool_id: &str) -> Result<u64, Error> {
        let resp: ViewResponse = self.post_empty(&format!("/views/{tool_id}")).await?;
        Ok(resp.views)
    }

    /// Cast a vote for a tool on behalf of `voter_id`. Returns the new vote count.
    pub async fn cast_vote(&self, tool_id: &str, voter_id: &str) -> Result<u64, Error> {
        let resp: VoteResponse = self
            .post_json(&format!("/votes/{tool_id}"), &VoteRequest { voter_id })
            .await?;
        Ok(resp.votes)
    }
}
