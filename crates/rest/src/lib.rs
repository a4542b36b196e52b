//! # dbbe-rest - HTTP surface of the DBBE search
//!
//! Axum application serving the search pages and the JSON search API of the
//! Database of Byzantine Book Epigrams. Query sanitization, visibility rules
//! and the engines live in [`dbbe_search`]; this crate adds configuration,
//! request extraction, error mapping and routing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbbe_rest::{create_app_with_config, ServerConfig};
//! use dbbe_search::backends::memory::MemoryEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = MemoryEngine::from_file("data/sample.json")?;
//!     let config = ServerConfig::default();
//!
//!     let app = create_app_with_config(engine, config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Endpoint | Description |
//! |----------|-------------|
//! | `GET /[entity]/search` | HTML page with the first result embedded |
//! | `GET /[entity]/search_api` | `{data, count, aggregation}` as JSON |
//! | `GET /[entity]` | `{id, name}` listing |
//! | `GET /[entity]/[id]` | Full record |
//! | `GET /[entity]/[id]/[related]` | Records referencing `[entity]/[id]` |
//! | `GET /health` | Health check |
//!
//! The JSON endpoints answer 400 unless `Accept` allows `application/json`.
//!
//! ## Internal access
//!
//! The caller's roles arrive in a header set by the authenticating proxy
//! (`X-Dbbe-Roles` by default). Without the internal role, searches are
//! restricted to public records and internal-only filters are dropped.
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": {"code", "message"}}`:
//!
//! | HTTP Status | Code | Description |
//! |-------------|------|-------------|
//! | 400 | invalid | Bad request |
//! | 404 | not-found | Unknown entity or record |
//! | 500 | exception | Internal server error |
//! | 502 | backend | Search backend failure |

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routing;
pub mod state;
pub mod view;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use dbbe_search::core::{ObjectStore, SearchEngine};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// `backend` serves both searches and record lookups.
pub fn create_app<B>(backend: B) -> Router
where
    B: SearchEngine + ObjectStore + 'static,
{
    create_app_with_config(backend, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
pub fn create_app_with_config<B>(backend: B, config: ServerConfig) -> Router
where
    B: SearchEngine + ObjectStore + 'static,
{
    let backend = Arc::new(backend);
    create_app_with_parts(backend.clone(), backend, config)
}

/// Creates the Axum application from a separate engine and object store.
///
/// Used when searches go to Elasticsearch while records come from elsewhere.
pub fn create_app_with_parts(
    engine: Arc<dyn SearchEngine>,
    store: Arc<dyn ObjectStore>,
    config: ServerConfig,
) -> Router {
    info!(
        "Creating DBBE search server with backend: {}",
        engine.backend_name()
    );

    let state = AppState::new(engine, store, config.clone());
    create_app_with_state(state)
}

/// Creates the Axum application around a prepared state.
pub fn create_app_with_state(state: AppState) -> Router {
    let config = state.config().clone();
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = split_list(&config.cors_origins)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = split_list(&config.cors_methods)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = split_list(&config.cors_headers)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dbbe={level},dbbe_rest={level},dbbe_search={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
