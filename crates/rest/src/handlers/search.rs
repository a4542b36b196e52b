//! Search handlers.
//!
//! Both endpoints run the same pipeline: raw parameters are sanitized for
//! the caller's privilege level, then handed to the engine together with
//! the entity's facet fields.
//!
//! - `GET [base]/[entity]/search` - HTML page with the first result embedded
//! - `GET [base]/[entity]/search_api` - the result as JSON

use axum::{
    Json,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use dbbe_search::entity::EntityKind;
use dbbe_search::types::SearchResponse;
use tracing::{debug, info};

use crate::error::RestResult;
use crate::extractors::{CallerRole, JsonOnly, SearchParams};
use crate::handlers::resolve_entity;
use crate::state::AppState;

async fn run_search(
    state: &AppState,
    entity: EntityKind,
    params: &SearchParams,
    caller: CallerRole,
) -> RestResult<SearchResponse> {
    let request = state
        .sanitizer(entity)
        .sanitize(params, caller.can_view_internal());

    debug!(
        entity = %entity,
        limit = request.limit,
        page = request.page,
        filters = request.filters.len(),
        internal = caller.can_view_internal(),
        "Processing search request"
    );

    let response = state
        .engine()
        .search_with_aggregation(entity, &request, caller.can_view_internal())
        .await?;

    info!(
        entity = %entity,
        count = response.count,
        returned = response.data.len(),
        "Search completed"
    );

    Ok(response)
}

/// Handler for the search page.
///
/// # HTTP Request
///
/// `GET [base]/[entity]/search?[parameters]`
///
/// # Response
///
/// - `200 OK` - HTML document embedding `{data, count, aggregation}`
/// - `404 Not Found` - Unknown entity path
pub async fn search_page_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    caller: CallerRole,
    params: SearchParams,
) -> RestResult<Response> {
    let entity = resolve_entity(&segment)?;
    let response = run_search(&state, entity, &params, caller).await?;
    Ok(Html(state.renderer().render_search(entity, &response)).into_response())
}

/// Handler for the JSON search endpoint.
///
/// # HTTP Request
///
/// `GET [base]/[entity]/search_api?limit&page&orderBy&ascending&filters[...]`
///
/// # Headers
///
/// - `Accept` - must allow `application/json`
///
/// # Response
///
/// - `200 OK` - `{data, count, aggregation}`
/// - `400 Bad Request` - `Accept` does not allow JSON
/// - `404 Not Found` - Unknown entity path
pub async fn search_api_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    _json: JsonOnly,
    caller: CallerRole,
    params: SearchParams,
) -> RestResult<Response> {
    let entity = resolve_entity(&segment)?;
    let response = run_search(&state, entity, &params, caller).await?;
    Ok(Json(response).into_response())
}
