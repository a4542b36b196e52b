//! Public/internal redaction of search filters.
//!
//! Callers without the internal-view privilege may only ever see public
//! records and public comments. Instead of rejecting their filters, the
//! policy downgrades them:
//!
//! - `public` is forced to `true`
//! - a `comment` filter searches `public_comment` instead
//! - internal-only filters are removed
//!
//! Results get the same treatment: internal-only facets are not computed
//! and hits lose their private comment and internal-only fields.

use serde_json::Value;

use crate::types::{FilterValue, Filters};

/// Filter keys that only privileged callers may use.
pub const INTERNAL_ONLY_KEYS: &[&str] = &[
    "text_status",
    "critical_status",
    "management",
    "management_inverse",
];

/// Applies the visibility rules to a set of sanitized filters.
///
/// Pure and idempotent. Privileged callers get their filters back unchanged.
pub fn apply_visibility(mut filters: Filters, caller_can_view_internal: bool) -> Filters {
    if caller_can_view_internal {
        return filters;
    }

    filters.insert("public".to_string(), FilterValue::Flag(true));

    if let Some(comment) = filters.remove("comment") {
        filters.entry("public_comment".to_string()).or_insert(comment);
    }

    for key in INTERNAL_ONLY_KEYS {
        filters.remove(*key);
    }

    filters
}

/// Record fields hidden from callers without internal access.
const PRIVATE_RECORD_KEYS: &[&str] = &["comment"];

/// Returns the facet fields a caller may see, in their original order.
pub fn visible_facets<'a>(fields: &[&'a str], caller_can_view_internal: bool) -> Vec<&'a str> {
    fields
        .iter()
        .copied()
        .filter(|field| caller_can_view_internal || !INTERNAL_ONLY_KEYS.contains(field))
        .collect()
}

/// Removes the private comment and internal-only fields from a record.
///
/// Non-object values are left alone.
pub fn redact_record(record: &mut Value) {
    if let Value::Object(map) = record {
        for key in PRIVATE_RECORD_KEYS.iter().chain(INTERNAL_ONLY_KEYS) {
            map.remove(*key);
        }
    }
}
