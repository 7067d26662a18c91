//! View and vote counters merged into ranking and display.

use std::collections::{HashMap, HashSet};

use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::client::{CountMap, Error, SiteClient};

/// A point-in-time copy of the counters. Missing ids read as zero.
#[derive(Debug, Clone, Default)]
pub struct Counts {
    views: CountMap,
    votes: CountMap,
}

impl Counts {
    pub fn new(views: CountMap, votes: CountMap) -> Self {
        Self { views, votes }
    }

    pub fn views(&self, id: &str) -> u64 {
        self.views.get(id).copied().unwrap_or(0)
    }

    pub fn votes(&self, id: &str) -> u64 {
        self.votes.get(id).copied().unwrap_or(0)
    }
}

/// Result of a vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was recorded; carries the new local count.
    Counted(u64),
    /// This voter already voted for the tool; carries the current count.
    AlreadyVoted(u64),
}

/// Shared counter cache plus the per-voter has-voted sets.
///
/// The snapshot is eventually consistent: it is replaced on refresh and
/// bumped locally after successful writes.
#[derive(Debug, Default)]
pub struct CountsTracker {
    snapshot: RwLock<Counts>,
    refreshed_at: RwLock<Option<Instant>>,
    voted: RwLock<HashMap<String, HashSet<String>>>,
}

impl CountsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> Counts {
        self.snapshot.read().await.clone()
    }

    /// Fetch views and votes concurrently and merge whatever succeeded.
    ///
    /// A failed fetch keeps the previous values for that counter.
    pub async fn refresh(&self, client: &SiteClient) -> Counts {
        let (views, votes) = tokio::join!(client.view_counts(), client.vote_counts());

        let mut snapshot = self.snapshot.write().await;
        match views {
            Ok(views) => snapshot.views = views,
            Err(e) => tracing::warn!(error = %e, "View counts unavailable, keeping last snapshot"),
        }
        match votes {
            Ok(votes) => snapshot.votes = votes,
            Err(e) => tracing::warn!(error = %e, "Vote counts unavailable, keeping last snapshot"),
        }
        *self.refreshed_at.write().await = Some(Instant::now());
        snapshot.clone()
    }

    /// Snapshot no older than `max_age`, refreshing first if needed.
    pub async fn current(&self, client: &SiteClient, max_age: Duration) -> Counts {
        let fresh = self
            .refreshed_at
            .read()
            .await
            .is_some_and(|at| at.elapsed() < max_age);
        if fresh {
            self.snapshot().await
        } else {
            self.refresh(client).await
        }
    }

    pub async fn has_voted(&self, voter: &str, tool_id: &str) -> bool {
        self.voted
            .read()
            .await
            .get(voter)
            .is_some_and(|tools| tools.contains(tool_id))
    }

    /// Vote for `tool_id` once per `voter`.
    ///
    /// A repeat vote is answered locally without calling the service. On
    /// success the local count is bumped by one (or raised to the server's
    /// count if that is higher).
    pub async fn vote(
        &self,
        client: &SiteClient,
        tool_id: &str,
        voter: &str,
    ) -> Result<VoteOutcome, Error> {
        // Reserve the vote first so concurrent repeats cannot both go through.
        let first = self
            .voted
            .write()
            .await
            .entry(voter.to_string())
            .or_default()
            .insert(tool_id.to_string());
        if !first {
            let current = self.snapshot.read().await.votes(tool_id);
            return Ok(VoteOutcome::AlreadyVoted(current));
        }

        match client.cast_vote(tool_id, voter).await {
            Ok(server_total) => {
                let mut snapshot = self.snapshot.write().await;
                let next = (snapshot.votes(tool_id) + 1).max(server_total);
                snapshot.votes.insert(tool_id.to_string(), next);
                tracing::info!(tool_id, voter, votes = next, "Vote recorded");
                Ok(VoteOutcome::Counted(next))
            }
            Err(e) => {
                if let Some(tools) = self.voted.write().await.get_mut(voter) {
                    tools.remove(tool_id);
                }
                Err(e)
            }
        }
    }

    /// Record a view and bump the local count.
    pub async fn record_view(&self, client: &SiteClient, tool_id: &str) -> Result<u64, Error> {
        let server_total = client.record_view(tool_id).await?;
        let mut snapshot = self.snapshot.write().await;
        let next = (snapshot.views(tool_id) + 1).max(server_total);
        snapshot.views.insert(tool_id.to_string(), next);
        Ok(next)
    }
}
