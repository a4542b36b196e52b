//! Search request dispatch.
//!
//! One [`SearchRequestDispatcher`] serves one stream of queries (one search
//! form). Issuing a query cancels the one still in flight, so at most one
//! request is outstanding and only the latest result is ever applied.
//!
//! Dispatch is split in two halves so a driver can keep handling input while
//! the request runs:
//!
//! - [`issue`](SearchRequestDispatcher::issue) returns a `Send + 'static`
//!   future that resolves to a [`Completion`];
//! - [`settle`](SearchRequestDispatcher::settle) turns a completion into the
//!   data to show.
//!
//! A superseded request settles to nothing. A cancelled one settles to the
//! last good response without an alert. A failed one adds an alert and
//! also settles to the last good response, so the page keeps what it had.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dbbe_search::types::SearchResponse;
use tokio_util::sync::CancellationToken;

use crate::error::{TransportError, TransportResult};
use crate::model::SearchQuery;

/// Sends queries to the search API.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Runs one search.
    async fn search(&self, query: &SearchQuery) -> TransportResult<SearchResponse>;
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server answered.
    Completed(SearchResponse),
    /// The request was cancelled before it finished.
    Cancelled,
    /// The request failed.
    Failed(TransportError),
}

/// A finished request.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Sequence number assigned by [`SearchRequestDispatcher::issue`].
    pub generation: u64,
    /// The query that was sent.
    pub query: SearchQuery,
    /// How it ended.
    pub outcome: Outcome,
}

/// A request in flight.
pub type PendingSearch = Pin<Box<dyn Future<Output = Completion> + Send>>;

/// A failure shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// What went wrong.
    pub message: String,
    /// When it was reported.
    pub at: DateTime<Utc>,
}

/// User-visible alert list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alerts {
    entries: Vec<Alert>,
}

impl Alerts {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alert.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(Alert {
            message: message.into(),
            at: Utc::now(),
        });
    }

    /// Number of alerts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the alerts, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.entries.iter()
    }

    /// Removes every alert, e.g. after the user dismissed them.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Issues queries with at most one in flight.
pub struct SearchRequestDispatcher {
    transport: Arc<dyn SearchTransport>,
    generation: u64,
    in_flight: Option<CancellationToken>,
    last_good: SearchResponse,
}

impl std::fmt::Debug for SearchRequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchRequestDispatcher")
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight.is_some())
            .field("last_good_count", &self.last_good.count)
            .finish()
    }
}

impl SearchRequestDispatcher {
    /// Creates a dispatcher with an empty snapshot.
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            transport,
            generation: 0,
            in_flight: None,
            last_good: SearchResponse::default(),
        }
    }

    /// Starts from the data already shown, e.g. the page's embedded result.
    pub fn with_snapshot(mut self, snapshot: SearchResponse) -> Self {
        self.last_good = snapshot;
        self
    }

    /// Replaces the snapshot returned when no fresh data is available.
    pub fn set_snapshot(&mut self, snapshot: SearchResponse) {
        self.last_good = snapshot;
    }

    /// The last response that completed.
    pub fn last_good(&self) -> &SearchResponse {
        &self.last_good
    }

    /// Returns true while a request is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Starts a request for `query`, cancelling the previous one.
    ///
    /// The returned future does not borrow the dispatcher and may be
    /// spawned.
    pub fn issue(&mut self, query: SearchQuery) -> PendingSearch {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        let transport = Arc::clone(&self.transport);

        tracing::debug!(generation, "Issuing search request");
        Box::pin(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Outcome::Cancelled,
                result = transport.search(&query) => match result {
                    Ok(response) => Outcome::Completed(response),
                    Err(err) => Outcome::Failed(err),
                },
            };
            Completion {
                generation,
                query,
                outcome,
            }
        })
    }

    /// Cancels the request in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            tracing::debug!(generation = self.generation, "Cancelling search request");
            token.cancel();
        }
    }

    /// Turns a completion into the data to apply.
    ///
    /// Returns `None` for a superseded request, whose data must not be
    /// applied.
    pub fn settle(&mut self, completion: Completion, alerts: &mut Alerts) -> Option<SearchResponse> {
        if completion.generation != self.generation {
            tracing::debug!(
                generation = completion.generation,
                latest = self.generation,
                "Discarding superseded search result"
            );
            return None;
        }
        self.in_flight = None;

        match completion.outcome {
            Outcome::Completed(response) => {
                tracing::debug!(count = response.count, "Search completed");
                self.last_good = response.clone();
                Some(response)
            }
            Outcome::Cancelled => Some(self.last_good.clone()),
            Outcome::Failed(err) => {
                tracing::warn!(error = %err, query = %completion.query.to_query_string(), "Search failed");
                alerts.push(format!("Something went wrong while processing your search: {}", err));
                Some(self.last_good.clone())
            }
        }
    }

    /// Issues `query` and waits for the data to apply.
    pub async fn dispatch(&mut self, query: SearchQuery, alerts: &mut Alerts) -> SearchResponse {
        let completion = self.issue(query).await;
        self.settle(completion, alerts)
            .unwrap_or_else(|| self.last_good.clone())
    }
}
