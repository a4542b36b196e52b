//! Shared helpers for the client integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dbbe_client::dispatch::SearchTransport;
use dbbe_client::error::{TransportError, TransportResult};
use dbbe_client::model::SearchQuery;
use dbbe_client::{
    ClientConfig, MemoryHistory, MemorySessionStorage, QueryLifecycleCoordinator, SearchSchema,
    SearchSession, SessionHistorySync, UiEvent,
};
use dbbe_search::types::{AggregationBucket, AggregationResult, SearchResponse};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::Instant;

type DelayFn = Box<dyn Fn(&SearchQuery) -> Duration + Send + Sync>;

/// Transport answering every query after a configurable delay.
///
/// Each response carries the serialized query in `data[0].query` so tests
/// can tell which request produced the data on screen.
pub struct ScriptedTransport {
    calls: Mutex<Vec<(Instant, SearchQuery)>>,
    delay: DelayFn,
    aggregation: AggregationResult,
    fail: bool,
}

impl ScriptedTransport {
    /// Answers at once with `aggregation`.
    pub fn new(aggregation: AggregationResult) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            delay: Box::new(|_| Duration::ZERO),
            aggregation,
            fail: false,
        }
    }

    /// Delays each answer by `delay(query)`.
    pub fn with_delay(
        mut self,
        delay: impl Fn(&SearchQuery) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.delay = Box::new(delay);
        self
    }

    /// Fails every call.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Queries received so far, with the time they arrived.
    pub fn calls(&self) -> Vec<(Instant, SearchQuery)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTransport for ScriptedTransport {
    async fn search(&self, query: &SearchQuery) -> TransportResult<SearchResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), query.clone()));
        tokio::time::sleep((self.delay)(query)).await;
        if self.fail {
            return Err(TransportError::Status {
                status: 502,
                message: "Search backend memory failed".into(),
            });
        }
        Ok(response_for(query, self.aggregation.clone()))
    }
}

/// The response [`ScriptedTransport`] gives for `query`.
pub fn response_for(query: &SearchQuery, aggregation: AggregationResult) -> SearchResponse {
    SearchResponse {
        data: vec![json!({ "query": query.to_query_string() })],
        count: 1,
        aggregation,
    }
}

/// Serialized query behind the data on screen.
pub fn applied_query(session: &SearchSession) -> Option<String> {
    session.applied().data.first()?["query"]
        .as_str()
        .map(str::to_string)
}

/// Manuscript aggregation: two cities, libraries in Athos, two contents.
pub fn manuscript_aggregation() -> AggregationResult {
    let mut aggregation = AggregationResult::new();
    aggregation.insert(
        "city".into(),
        vec![
            AggregationBucket::new(10, "Athos", 2),
            AggregationBucket::new(11, "Vatican City", 1),
        ],
    );
    aggregation.insert(
        "library".into(),
        vec![
            AggregationBucket::new(20, "Iviron", 1),
            AggregationBucket::new(22, "Lavra", 1),
        ],
    );
    aggregation.insert(
        "content".into(),
        vec![
            AggregationBucket::new(100, "Gospels", 2),
            AggregationBucket::new(101, "Psalter", 1),
        ],
    );
    aggregation
}

/// A session over `transport` whose history starts at `url`.
pub fn session(
    schema: &'static SearchSchema,
    config: ClientConfig,
    transport: Arc<ScriptedTransport>,
    url: &str,
) -> (SearchSession, Arc<MemoryHistory>) {
    let history = Arc::new(MemoryHistory::new(url));
    let sync = SessionHistorySync::new(
        schema,
        history.clone(),
        Arc::new(MemorySessionStorage::new()),
    );
    let session = SearchSession::new(
        QueryLifecycleCoordinator::new(schema, config),
        transport,
        sync,
    );
    (session, history)
}

/// Runs `session` on its own task; returns the event sender and the handle
/// yielding the session once the sender is dropped and work has drained.
pub fn spawn(
    mut session: SearchSession,
) -> (
    mpsc::Sender<UiEvent>,
    tokio::task::JoinHandle<SearchSession>,
) {
    let (events, rx) = mpsc::channel(32);
    let handle = tokio::spawn(async move {
        session.run(rx).await;
        session
    });
    (events, handle)
}
