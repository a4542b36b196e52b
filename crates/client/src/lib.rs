//! # dbbe-client - headless search page client
//!
//! Everything a DBBE search page does between the user's input and the
//! search API, without any rendering:
//!
//! - [`schema`] - the fields of each entity's search form
//! - [`facets`] - per-field states driven by aggregation buckets
//! - [`validation`] - year checks and cross-bounding
//! - [`coordinator`] - from edits to queries: debounce, sort suppression,
//!   stripping of inapplicable filters and duplicate suppression
//! - [`dispatch`] - at most one request in flight, last-good fallback
//! - [`history`] - URL and session storage
//! - [`session`] - the event loop tying it together
//! - [`transport`] - reqwest transport for `search_api`
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use dbbe_client::{
//!     ClientConfig, HttpTransport, MemoryHistory, MemorySessionStorage,
//!     QueryLifecycleCoordinator, SearchSchema, SearchSession, SessionHistorySync, UiEvent,
//! };
//! use dbbe_client::model::FieldValue;
//! use dbbe_search::entity::EntityKind;
//! use dbbe_search::types::SearchResponse;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://127.0.0.1:8080");
//!     let schema = SearchSchema::for_entity(EntityKind::Occurrence);
//!     let transport = Arc::new(HttpTransport::new(&config, EntityKind::Occurrence)?);
//!     let history = SessionHistorySync::new(
//!         schema,
//!         Arc::new(MemoryHistory::new("")),
//!         Arc::new(MemorySessionStorage::new()),
//!     );
//!
//!     let mut session = SearchSession::new(
//!         QueryLifecycleCoordinator::new(schema, config),
//!         transport,
//!         history,
//!     );
//!     session.start(SearchResponse::default());
//!
//!     let (events, rx) = tokio::sync::mpsc::channel(16);
//!     events.send(UiEvent::input("text", FieldValue::Text("βασιλεύς".into()))).await?;
//!     drop(events);
//!     session.run(rx).await;
//!
//!     println!("{} occurrences", session.applied().count);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod facets;
pub mod history;
pub mod model;
pub mod schema;
pub mod session;
pub mod transport;
pub mod validation;

pub use config::ClientConfig;
pub use coordinator::{Action, NavigationGuard, Phase, QueryLifecycleCoordinator, RestoredState};
pub use dispatch::{Alerts, SearchRequestDispatcher, SearchTransport};
pub use error::{TransportError, TransportResult};
pub use facets::{FacetFieldController, FieldState};
pub use history::{MemoryHistory, MemorySessionStorage, SessionHistorySync};
pub use schema::{FieldDescriptor, FieldKind, SearchSchema};
pub use session::{SearchSession, UiEvent};
pub use transport::HttpTransport;
