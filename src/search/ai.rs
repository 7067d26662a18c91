//! Latest-wins AI relevance lookups.
//!
//! Every lookup takes a new generation number and aborts the request it
//! replaces. A result whose generation is no longer current is reported as
//! [`AiLookup::Superseded`] and must not be applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::{AbortHandle, JoinHandle};

use crate::client::{AiMatch, Error, SiteClient};

/// Result of one lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum AiLookup {
    Ready(Vec<AiMatch>),
    /// The service failed, timed out, or answered with a malformed body.
    Failed,
    /// A newer lookup or a cancel replaced this one.
    Superseded,
}

/// A request issued by [`AiSearch::start`].
#[derive(Debug)]
pub struct PendingLookup {
    query: String,
    generation: u64,
    task: JoinHandle<Result<Vec<AiMatch>, Error>>,
}

impl PendingLookup {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Owner of the single in-flight relevance request.
#[derive(Debug)]
pub struct AiSearch {
    client: Arc<SiteClient>,
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl AiSearch {
    pub fn new(client: Arc<SiteClient>) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Current generation. Bumped by every lookup and cancel.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Run a lookup for `query`, superseding any outstanding one.
    pub async fn lookup(&self, query: &str) -> AiLookup {
        let pending = self.start(query);
        self.finish(pending).await
    }

    /// Issue the request for `query` without waiting for it.
    ///
    /// The generation is taken here, so call order decides which request
    /// is the latest even if the returned handles are awaited out of order.
    pub fn start(&self, query: &str) -> PendingLookup {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim().to_string();

        let client = Arc::clone(&self.client);
        let request_query = query.clone();
        let task = tokio::spawn(async move { client.relevance(&request_query).await });
        self.replace_in_flight(Some(task.abort_handle()));

        tracing::debug!(%query, generation, "AI lookup started");
        PendingLookup {
            query,
            generation,
            task,
        }
    }

    /// Wait for a started lookup.
    pub async fn finish(&self, pending: PendingLookup) -> AiLookup {
        let PendingLookup {
            query,
            generation,
            task,
        } = pending;
        let result = task.await;

        if self.generation() != generation {
            tracing::debug!(%query, generation, "AI lookup superseded");
            return AiLookup::Superseded;
        }
        self.replace_in_flight(None);

        match result {
            Ok(Ok(matches)) => {
                tracing::info!(%query, results = matches.len(), "AI lookup completed");
                AiLookup::Ready(matches)
            }
            Ok(Err(e)) => {
                tracing::warn!(%query, error = %e, "AI lookup failed, showing no AI results");
                AiLookup::Failed
            }
            Err(e) if e.is_cancelled() => AiLookup::Superseded,
            Err(e) => {
                tracing::warn!(%query, error = %e, "AI lookup task failed");
                AiLookup::Failed
            }
        }
    }

    /// Abandon any outstanding lookup.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.replace_in_flight(None);
    }

    fn replace_in_flight(&self, next: Option<AbortHandle>) {
        let previous = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *slot, next)
        };
        if let Some(handle) = previous {
            handle.abort();
        }
    }
}

impl Drop for AiSearch {
    fn drop(&mut self) {
        if let Some(handle) = self
            .in_flight
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
