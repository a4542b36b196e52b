//! End-to-end behaviour of a search session against a scripted transport.
//!
//! All tests run on tokio's paused clock, so debounce and request delays
//! are exact and instantaneous.

mod common;

use std::sync::Arc;
use std::time::Duration;

use dbbe_client::dispatch::{Alerts, Completion, Outcome, SearchRequestDispatcher};
use dbbe_client::facets::DisabledReason;
use dbbe_client::history::HistoryBackend;
use dbbe_client::model::{FieldValue, Item};
use dbbe_client::schema::{MANUSCRIPT_SEARCH, OCCURRENCE_SEARCH};
use dbbe_client::{ClientConfig, FieldState, QueryLifecycleCoordinator, UiEvent};
use dbbe_search::types::{AggregationResult, ParamValue, SearchResponse};
use tokio::time::{Instant, sleep};

use common::{
    ScriptedTransport, applied_query, manuscript_aggregation, response_for, session, spawn,
};

fn city(id: u64, name: &str) -> FieldValue {
    FieldValue::Item(Item::new(id, name))
}

// ============================================================================
// Debounce
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_typing_dispatches_once_after_last_keystroke() {
    let transport = Arc::new(ScriptedTransport::new(AggregationResult::new()));
    let (mut session, _) = session(
        &OCCURRENCE_SEARCH,
        ClientConfig::default(),
        transport.clone(),
        "",
    );
    session.start(SearchResponse::default());
    let started = Instant::now();
    let (events, handle) = spawn(session);

    for typed in ["β", "βα", "βασ"] {
        events
            .send(UiEvent::input("text", FieldValue::Text(typed.into())))
            .await
            .unwrap();
        sleep(Duration::from_millis(300)).await;
    }
    drop(events);
    let session = handle.await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (at, query) = &calls[0];
    assert_eq!(query.filters["text"], ParamValue::Scalar("βασ".into()));
    assert_eq!(query.order_by, None);
    // last keystroke at 600 ms
    let elapsed = at.duration_since(started);
    assert!(elapsed >= Duration::from_millis(1600), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1700), "{elapsed:?}");
    assert_eq!(session.requests_issued(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_query_is_not_sent() {
    let transport = Arc::new(ScriptedTransport::new(manuscript_aggregation()));
    let (mut session, _) = session(
        &MANUSCRIPT_SEARCH,
        ClientConfig::default(),
        transport.clone(),
        "",
    );
    session.start(SearchResponse::default());
    let (events, handle) = spawn(session);

    events.send(UiEvent::input("city", city(10, "Athos"))).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    events.send(UiEvent::input("city", city(10, "Athos"))).await.unwrap();
    events.send(UiEvent::input("shelf", FieldValue::Text("  ".into()))).await.unwrap();
    drop(events);
    handle.await.unwrap();

    assert_eq!(transport.calls().len(), 1);
}

// ============================================================================
// At most one request in flight
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_only_latest_response_is_applied() {
    // Athos answers slowly, Vatican City quickly.
    let transport = Arc::new(
        ScriptedTransport::new(manuscript_aggregation()).with_delay(|query| {
            match query.filters.get("city") {
                Some(ParamValue::Scalar(id)) if id == "10" => Duration::from_millis(500),
                _ => Duration::from_millis(50),
            }
        }),
    );
    let (mut session, _) = session(
        &MANUSCRIPT_SEARCH,
        ClientConfig::default(),
        transport.clone(),
        "",
    );
    session.start(SearchResponse::default());
    let (events, handle) = spawn(session);

    events.send(UiEvent::input("city", city(10, "Athos"))).await.unwrap();
    sleep(Duration::from_millis(100)).await;
    events
        .send(UiEvent::input("city", city(11, "Vatican City")))
        .await
        .unwrap();
    drop(events);
    let session = handle.await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    let latest = &calls[1].1;
    assert_eq!(applied_query(&session), Some(latest.to_query_string()));
    assert_eq!(session.coordinator().model().get("city"), &city(11, "Vatican City"));
    assert!(session.alerts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_late_result_of_superseded_request_is_discarded() {
    let transport = Arc::new(ScriptedTransport::new(AggregationResult::new()));
    let mut dispatcher = SearchRequestDispatcher::new(transport);
    let mut alerts = Alerts::new();
    let coordinator = QueryLifecycleCoordinator::new(&MANUSCRIPT_SEARCH, ClientConfig::default());

    let mut first = coordinator.current_query();
    first.page = 1;
    let mut second = first.clone();
    second.page = 2;

    drop(dispatcher.issue(first.clone()));
    let completion = dispatcher.issue(second.clone()).await;
    let applied = dispatcher.settle(completion, &mut alerts).unwrap();

    // the first request's transport resolves after all
    let late = Completion {
        generation: 1,
        query: first.clone(),
        outcome: Outcome::Completed(response_for(&first, AggregationResult::new())),
    };
    assert!(dispatcher.settle(late, &mut alerts).is_none());
    assert_eq!(dispatcher.last_good(), &applied);
    assert_eq!(applied, response_for(&second, AggregationResult::new()));
}

#[tokio::test(start_paused = true)]
async fn test_failure_alerts_and_keeps_data() {
    let transport = Arc::new(ScriptedTransport::new(AggregationResult::new()).failing());
    let (mut session, _) = session(
        &MANUSCRIPT_SEARCH,
        ClientConfig::default(),
        transport,
        "",
    );
    let initial = response_for(
        &QueryLifecycleCoordinator::new(&MANUSCRIPT_SEARCH, ClientConfig::default())
            .current_query(),
        manuscript_aggregation(),
    );
    session.start(initial.clone());
    let (events, handle) = spawn(session);

    events.send(UiEvent::input("city", city(10, "Athos"))).await.unwrap();
    drop(events);
    let session = handle.await.unwrap();

    assert_eq!(session.applied(), &initial);
    assert_eq!(session.alerts().len(), 1);
    let alert = session.alerts().iter().next().unwrap();
    assert!(alert.message.contains("502"), "{}", alert.message);
}

#[tokio::test(start_paused = true)]
async fn test_failed_query_is_sent_again() {
    let transport = Arc::new(ScriptedTransport::new(AggregationResult::new()).failing());
    let (mut session, _) = session(
        &MANUSCRIPT_SEARCH,
        ClientConfig::default(),
        transport.clone(),
        "",
    );
    session.start(SearchResponse::default());
    let (events, handle) = spawn(session);

    events.send(UiEvent::input("city", city(10, "Athos"))).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    events.send(UiEvent::input("city", city(10, "Athos"))).await.unwrap();
    drop(events);
    let session = handle.await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1, calls[1].1);
    assert_eq!(session.alerts().len(), 2);
}

// ============================================================================
// Facets
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_clearing_dependency_disables_dependant() {
    let transport = Arc::new(ScriptedTransport::new(manuscript_aggregation()));
    let (mut session, _) = session(
        &MANUSCRIPT_SEARCH,
        ClientConfig::default(),
        transport.clone(),
        "",
    );
    session.start(SearchResponse::default());
    let (events, handle) = spawn(session);

    events.send(UiEvent::input("city", city(10, "Athos"))).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    events
        .send(UiEvent::input("library", FieldValue::Item(Item::new(20, "Iviron"))))
        .await
        .unwrap();
    sleep(Duration::from_millis(10)).await;
    events.send(UiEvent::input("city", FieldValue::Empty)).await.unwrap();
    drop(events);
    let session = handle.await.unwrap();

    let coordinator = session.coordinator();
    assert!(!coordinator.model().has_value("library"));
    assert_eq!(
        coordinator.facets().state("library"),
        FieldState::Disabled(DisabledReason::AwaitingDependency)
    );
    let last = transport.calls().pop().unwrap().1;
    assert!(!last.filters.contains_key("library"));
    assert!(!last.filters.contains_key("city"));
}

#[tokio::test(start_paused = true)]
async fn test_search_page_keeps_selection_without_candidates() {
    for (search_page, kept) in [(true, true), (false, false)] {
        let transport = Arc::new(ScriptedTransport::new(AggregationResult::new()));
        let config = ClientConfig {
            search_page,
            ..ClientConfig::default()
        };
        let (mut session, _) = session(&MANUSCRIPT_SEARCH, config, transport, "");
        session.start(SearchResponse::default());
        let (events, handle) = spawn(session);

        events
            .send(UiEvent::input(
                "content",
                FieldValue::Items(vec![Item::new(100, "Gospels")]),
            ))
            .await
            .unwrap();
        drop(events);
        let session = handle.await.unwrap();

        let coordinator = session.coordinator();
        assert_eq!(coordinator.model().has_value("content"), kept);
        assert_eq!(
            coordinator.facets().state("content"),
            FieldState::Disabled(DisabledReason::NoValues)
        );
    }
}

// ============================================================================
// Year bounds
// ============================================================================

#[test]
fn test_year_bounds_never_cross() {
    let edits: &[(&str, &str)] = &[
        ("year_from", "1200"),
        ("year_to", "1100"),
        ("year_to", "1300"),
        ("year_from", "abc"),
        ("year_from", "20000"),
        ("year_to", "-4"),
        ("year_from", ""),
        ("year_to", "0"),
        ("year_from", "9999"),
    ];
    let mut coordinator =
        QueryLifecycleCoordinator::new(&MANUSCRIPT_SEARCH, ClientConfig::default());
    for (key, value) in edits {
        coordinator.on_field_input(key, FieldValue::Text(value.to_string()));
        let bounds = coordinator.year_bounds();
        assert!(bounds.from_min <= bounds.from_max, "{key}={value}: {bounds:?}");
        assert!(bounds.to_min <= bounds.to_max, "{key}={value}: {bounds:?}");
    }
}

// ============================================================================
// History
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_url_is_restored_on_start_and_history_pop() {
    let transport = Arc::new(ScriptedTransport::new(manuscript_aggregation()));
    let (mut session, history) = session(
        &MANUSCRIPT_SEARCH,
        ClientConfig::default(),
        transport.clone(),
        "filters[city]=10&filters[content][]=100&filters[content][]=999&page=2",
    );
    let mut initial = SearchResponse::default();
    initial.aggregation = manuscript_aggregation();
    session.start(initial);

    let coordinator = session.coordinator();
    assert_eq!(coordinator.model().get("city"), &city(10, "Athos"));
    assert_eq!(
        coordinator.model().get("content"),
        &FieldValue::Items(vec![Item::new(100, "Gospels")])
    );
    assert_eq!(coordinator.page(), 2);
    let first_url = history.current_query();
    assert_eq!(history.len(), 1);

    let (events, handle) = spawn(session);
    events
        .send(UiEvent::input("city", city(11, "Vatican City")))
        .await
        .unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(history.len(), 2);

    let back = history.back().unwrap();
    assert_eq!(back, first_url);
    events
        .send(UiEvent::HistoryPop { query: back })
        .await
        .unwrap();
    drop(events);
    let session = handle.await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history.current_query(), first_url);
    assert_eq!(session.coordinator().model().get("city"), &city(10, "Athos"));
    assert!(!session.coordinator().is_reloading_history());
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_edit_during_history_reload_is_sent_afterwards() {
    let transport = Arc::new(
        ScriptedTransport::new(manuscript_aggregation())
            .with_delay(|_| Duration::from_millis(500)),
    );
    let (mut session, _) = session(
        &MANUSCRIPT_SEARCH,
        ClientConfig::default(),
        transport.clone(),
        "",
    );
    let mut initial = SearchResponse::default();
    initial.aggregation = manuscript_aggregation();
    session.start(initial);
    let started = Instant::now();
    let (events, handle) = spawn(session);

    events
        .send(UiEvent::HistoryPop {
            query: "filters[city]=10".into(),
        })
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;
    events
        .send(UiEvent::input(
            "content",
            FieldValue::Items(vec![Item::new(101, "Psalter")]),
        ))
        .await
        .unwrap();
    drop(events);
    let session = handle.await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    let (_, reload) = &calls[0];
    assert_eq!(reload.filters["city"], ParamValue::Scalar("10".into()));
    assert!(!reload.filters.contains_key("content"));

    let (at, edited) = &calls[1];
    assert_eq!(edited.filters["city"], ParamValue::Scalar("10".into()));
    assert!(edited.filters.contains_key("content"));
    assert!(at.duration_since(started) >= Duration::from_millis(500));

    assert_eq!(applied_query(&session), Some(edited.to_query_string()));
    assert!(!session.coordinator().is_reloading_history());
    assert!(!session.coordinator().is_dirty());
}
