//! DBBE route configuration.

use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Creates all search API routes.
///
/// `{entity}` is one of `manuscripts`, `occurrences`, `types`, `persons`
/// or `bibliographies`; anything else answers 404.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /{entity}` - Short listing
/// - `GET /{entity}/search` - Search page
/// - `GET /{entity}/search_api` - JSON search
/// - `GET /{entity}/{id}` - Full record
/// - `GET /{entity}/{id}/{related}` - Dependencies
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/{entity}", get(handlers::short_list_handler))
        .route("/{entity}/search", get(handlers::search_page_handler))
        .route("/{entity}/search_api", get(handlers::search_api_handler))
        .route("/{entity}/{id}", get(handlers::read_handler))
        .route("/{entity}/{id}/{related}", get(handlers::dependencies_handler))
        .with_state(state)
}
