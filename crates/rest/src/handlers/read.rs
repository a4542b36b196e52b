//! Record lookup handlers.
//!
//! - `GET [base]/[entity]` - `{id, name}` list of every record
//! - `GET [base]/[entity]/[id]` - the complete record
//! - `GET [base]/[entity]/[id]/[related]` - records of `related` type
//!   referencing the record
//!
//! Callers without internal access get a 404 for non-public records, never
//! see non-public dependencies, and get every record redacted.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use dbbe_search::entity::EntityKind;
use dbbe_search::visibility::redact_record;
use serde_json::Value;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::{CallerRole, JsonOnly};
use crate::handlers::resolve_entity;
use crate::state::AppState;

fn is_public(doc: &Value) -> bool {
    doc.get("public").and_then(Value::as_bool).unwrap_or(false)
}

fn parse_id(entity: EntityKind, id: &str) -> RestResult<u64> {
    id.parse().map_err(|_| RestError::NotFound {
        entity: entity.to_string(),
        id: id.to_string(),
    })
}

/// Handler for the short listing.
///
/// # Response
///
/// - `200 OK` - JSON array of `{id, name}` ordered by name
/// - `404 Not Found` - Unknown entity path
pub async fn short_list_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    _json: JsonOnly,
) -> RestResult<Response> {
    let entity = resolve_entity(&segment)?;
    debug!(entity = %entity, "Processing short list request");

    let records = state.store().get_all_short(entity).await?;
    Ok(Json(records).into_response())
}

/// Handler for the full record.
///
/// # Response
///
/// - `200 OK` - The record
/// - `404 Not Found` - Unknown entity path, unknown id, or a non-public
///   record requested without internal access
pub async fn read_handler(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
    _json: JsonOnly,
    caller: CallerRole,
) -> RestResult<Response> {
    let entity = resolve_entity(&segment)?;
    let id = parse_id(entity, &id)?;
    debug!(entity = %entity, id, "Processing read request");

    let mut record = state.store().get_full(entity, id).await?;
    if !caller.can_view_internal() {
        if !is_public(&record) {
            return Err(RestError::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            });
        }
        redact_record(&mut record);
    }

    Ok(Json(record).into_response())
}

/// Handler for the dependency listing.
///
/// # Response
///
/// - `200 OK` - JSON array of the referencing records
/// - `404 Not Found` - Unknown entity path or unknown id
pub async fn dependencies_handler(
    State(state): State<AppState>,
    Path((segment, id, related)): Path<(String, String, String)>,
    _json: JsonOnly,
    caller: CallerRole,
) -> RestResult<Response> {
    let entity = resolve_entity(&segment)?;
    let related = resolve_entity(&related)?;
    let id = parse_id(entity, &id)?;
    debug!(entity = %entity, id, related = %related, "Processing dependencies request");

    let mut records = state.store().get_dependencies(entity, id, related).await?;
    if !caller.can_view_internal() {
        records.retain(is_public);
        records.iter_mut().for_each(redact_record);
    }

    Ok(Json(records).into_response())
}
