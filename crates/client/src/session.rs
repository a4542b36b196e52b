//! Event loop of one search page.
//!
//! [`SearchSession::run`] owns the coordinator, the dispatcher and the
//! history sync, and waits on three things at once: UI events, the debounce
//! deadline and finished requests. Requests run in spawned tasks and report
//! back over a channel, so everything that changes state happens on the
//! session's own task.

use std::sync::Arc;

use dbbe_search::types::SearchResponse;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::coordinator::{Action, QueryLifecycleCoordinator};
use crate::dispatch::{Alerts, Completion, Outcome, SearchRequestDispatcher, SearchTransport};
use crate::history::SessionHistorySync;
use crate::model::{FieldValue, SearchQuery};

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A field was edited.
    FieldInput {
        /// Field key.
        key: String,
        /// New value.
        value: FieldValue,
    },
    /// Another page was requested.
    Page(usize),
    /// Another sort was picked.
    Sort {
        /// Logical sort name.
        order_by: String,
        /// Sort direction.
        ascending: bool,
    },
    /// Back/forward navigation landed on `query`.
    HistoryPop {
        /// Query string of the entry.
        query: String,
    },
}

impl UiEvent {
    /// Shorthand for a field edit.
    pub fn input(key: impl Into<String>, value: FieldValue) -> Self {
        UiEvent::FieldInput {
            key: key.into(),
            value,
        }
    }
}

/// A running search page.
#[derive(Debug)]
pub struct SearchSession {
    coordinator: QueryLifecycleCoordinator,
    dispatcher: SearchRequestDispatcher,
    history: SessionHistorySync,
    alerts: Alerts,
    applied: SearchResponse,
    issued: usize,
}

#[derive(Debug)]
struct LoopState {
    deadline: Option<Instant>,
    in_flight: usize,
    done: mpsc::UnboundedSender<Completion>,
}

impl SearchSession {
    /// Creates a session.
    pub fn new(
        coordinator: QueryLifecycleCoordinator,
        transport: Arc<dyn SearchTransport>,
        history: SessionHistorySync,
    ) -> Self {
        Self {
            coordinator,
            dispatcher: SearchRequestDispatcher::new(transport),
            history,
            alerts: Alerts::new(),
            applied: SearchResponse::default(),
            issued: 0,
        }
    }

    /// Shows the result embedded in the page and reads the form state from
    /// the URL.
    pub fn start(&mut self, initial: SearchResponse) {
        self.history.init();
        let restored = self.history.init_from_url(&initial.aggregation);
        self.coordinator.restore(restored);
        self.coordinator.load_initial(&initial);
        self.history
            .on_data(&initial, &self.coordinator.current_query());
        self.dispatcher.set_snapshot(initial.clone());
        self.applied = initial;
    }

    /// The data on screen.
    pub fn applied(&self) -> &SearchResponse {
        &self.applied
    }

    /// Alerts raised so far.
    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    /// The coordinator.
    pub fn coordinator(&self) -> &QueryLifecycleCoordinator {
        &self.coordinator
    }

    /// Number of requests sent.
    pub fn requests_issued(&self) -> usize {
        self.issued
    }

    /// Handles events until the channel closes and nothing is pending.
    pub async fn run(&mut self, mut events: mpsc::Receiver<UiEvent>) {
        let (done, mut completions) = mpsc::unbounded_channel();
        let mut state = LoopState {
            deadline: None,
            in_flight: 0,
            done,
        };
        let mut events_open = true;

        loop {
            if !events_open && state.deadline.is_none() && state.in_flight == 0 {
                break;
            }
            let deadline = state.deadline;
            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => self.handle_event(event, &mut state),
                    None => events_open = false,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    state.deadline = None;
                    if let Some(query) = self.coordinator.on_debounce_elapsed() {
                        self.issue(query, &mut state);
                    }
                }
                Some(completion) = completions.recv(), if state.in_flight > 0 => {
                    state.in_flight -= 1;
                    self.on_completion(completion, &mut state);
                }
            }
        }
        tracing::debug!(issued = self.issued, "Search session finished");
    }

    fn handle_event(&mut self, event: UiEvent, state: &mut LoopState) {
        let action = match event {
            UiEvent::FieldInput { key, value } => self.coordinator.on_field_input(&key, value),
            UiEvent::Page(page) => self.coordinator.on_page(page),
            UiEvent::Sort {
                order_by,
                ascending,
            } => self.coordinator.on_sort(order_by, ascending),
            UiEvent::HistoryPop { query } => {
                state.deadline = None;
                let restored = self
                    .history
                    .init_from_query(&query, &self.applied.aggregation);
                self.history.on_history_pop();
                Action::Dispatch(self.coordinator.begin_history_reload(restored))
            }
        };

        match action {
            Action::None => {}
            Action::CancelPending => state.deadline = None,
            Action::Schedule { delay } => state.deadline = Some(Instant::now() + delay),
            Action::Dispatch(query) => {
                state.deadline = None;
                self.issue(query, state);
            }
        }
    }

    fn issue(&mut self, query: SearchQuery, state: &mut LoopState) {
        let pending = self.dispatcher.issue(query);
        let done = state.done.clone();
        tokio::spawn(async move {
            // the receiver only goes away once the session has stopped
            let _ = done.send(pending.await);
        });
        state.in_flight += 1;
        self.issued += 1;
    }

    fn on_completion(&mut self, completion: Completion, state: &mut LoopState) {
        let completed = matches!(completion.outcome, Outcome::Completed(_));
        let query = completion.query.clone();
        let Some(data) = self.dispatcher.settle(completion, &mut self.alerts) else {
            return;
        };
        let held = if completed {
            let held = self.coordinator.on_response(&data);
            self.history.on_data(&data, &query);
            held
        } else {
            let held = self.coordinator.on_dispatch_failed();
            self.history.on_error();
            held
        };
        self.applied = data;
        if let Some(held) = held {
            self.issue(held, state);
        }
    }
}
