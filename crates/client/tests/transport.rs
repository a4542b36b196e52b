//! HTTP transport against a live DBBE server.

use std::net::SocketAddr;
use std::sync::Arc;

use dbbe_client::dispatch::{Alerts, SearchRequestDispatcher, SearchTransport};
use dbbe_client::model::{FieldValue, Item};
use dbbe_client::schema::MANUSCRIPT_SEARCH;
use dbbe_client::{ClientConfig, HttpTransport, QueryLifecycleCoordinator, TransportError};
use dbbe_rest::{ServerConfig, create_app_with_config};
use dbbe_search::backends::memory::MemoryEngine;
use dbbe_search::entity::EntityKind;
use serde_json::json;

async fn serve() -> SocketAddr {
    let engine = MemoryEngine::new();
    engine
        .load_json(&json!({
            "manuscripts": [
                {
                    "id": 1, "name": "Athos, Iviron 5", "public": true,
                    "city": {"id": 10, "name": "Athos"},
                    "date_floor_year": 1050, "date_ceiling_year": 1100
                },
                {
                    "id": 2, "name": "Vaticanus gr. 1", "public": true,
                    "city": {"id": 11, "name": "Vatican City"},
                    "date_floor_year": 1200, "date_ceiling_year": 1300
                }
            ]
        }))
        .expect("Failed to load fixtures");
    let app = create_app_with_config(engine, ServerConfig::for_testing());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    addr
}

fn client_config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(format!("http://{addr}"))
}

#[tokio::test]
async fn test_search_through_coordinator_query() {
    let addr = serve().await;
    let config = client_config(addr);
    let transport = HttpTransport::new(&config, EntityKind::Manuscript).unwrap();

    let mut coordinator = QueryLifecycleCoordinator::new(&MANUSCRIPT_SEARCH, config);
    coordinator.on_field_input("city", FieldValue::Item(Item::new(10, "Athos")));
    let response = transport
        .search(&coordinator.current_query())
        .await
        .unwrap();

    assert_eq!(response.count, 1);
    assert_eq!(response.data[0]["name"], "Athos, Iviron 5");
    let cities: Vec<u64> = response.aggregation["city"].iter().map(|b| b.id).collect();
    assert_eq!(cities, vec![10, 11]);
}

#[tokio::test]
async fn test_error_statuses_are_reported() {
    let addr = serve().await;
    let config = client_config(addr);
    let transport = HttpTransport::new(&config, EntityKind::Bibliography).unwrap();
    let query = QueryLifecycleCoordinator::new(&MANUSCRIPT_SEARCH, config).current_query();

    // an entity without records answers with an empty page
    let response = transport.search(&query).await.unwrap();
    assert_eq!(response.count, 0);

    let wrong_base = ClientConfig::new(format!("http://{addr}/nowhere"));
    let transport = HttpTransport::new(&wrong_base, EntityKind::Manuscript).unwrap();
    let err = transport.search(&query).await.unwrap_err();
    assert!(
        matches!(err, TransportError::Status { status: 404, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_unreachable_server_raises_alert() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = client_config(addr);
    let transport = Arc::new(HttpTransport::new(&config, EntityKind::Manuscript).unwrap());
    let query = QueryLifecycleCoordinator::new(&MANUSCRIPT_SEARCH, config).current_query();
    let mut dispatcher = SearchRequestDispatcher::new(transport);
    let mut alerts = Alerts::new();

    let response = dispatcher.dispatch(query, &mut alerts).await;
    assert_eq!(response.count, 0);
    assert_eq!(alerts.len(), 1);
}
