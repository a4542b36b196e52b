//! Filter evaluation against JSON documents.

use serde_json::Value;

use crate::entity::{DateFields, FieldClassificationTable, FilterKind};
use crate::types::{
    DateSearchType, FilterValue, Filters, NestedOperator, TextMatchMode, YearRange,
};

/// Resolves a dotted field path, ignoring a trailing `.keyword`.
pub(super) fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_suffix(".keyword").unwrap_or(path);
    path.split('.')
        .try_fold(document, |value, segment| value.get(segment))
}

/// Collects related-entity ids from a number, an `{id}` object or an array
/// of either.
pub(super) fn ids_of(value: &Value) -> Vec<u64> {
    match value {
        Value::Number(n) => n.as_u64().into_iter().collect(),
        Value::Object(map) => map.get("id").and_then(Value::as_u64).into_iter().collect(),
        Value::Array(items) => items.iter().flat_map(ids_of).collect(),
        _ => Vec::new(),
    }
}

/// Flattens a field into searchable text.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => map.get("name").map(text_of).unwrap_or_default(),
        Value::Array(items) => items.iter().map(text_of).collect::<Vec<_>>().join(" "),
        _ => String::new(),
    }
}

fn text_matches(haystack: &str, query: &str, mode: TextMatchMode) -> bool {
    let haystack = haystack.to_lowercase();
    let query = query.to_lowercase();
    let mut terms = query.split_whitespace();
    match mode {
        TextMatchMode::Any => {
            let terms: Vec<&str> = terms.collect();
            terms.is_empty() || terms.iter().any(|term| haystack.contains(term))
        }
        TextMatchMode::All => terms.all(|term| haystack.contains(term)),
        TextMatchMode::Phrase => {
            let phrase = terms.collect::<Vec<_>>().join(" ");
            let haystack = haystack.split_whitespace().collect::<Vec<_>>().join(" ");
            haystack.contains(&phrase)
        }
    }
}

fn date_matches(
    document: &Value,
    fields: DateFields,
    range: YearRange,
    mode: DateSearchType,
) -> bool {
    let floor = document.get(fields.floor).and_then(Value::as_i64);
    let ceiling = document.get(fields.ceiling).and_then(Value::as_i64);
    let (floor, ceiling) = match (floor, ceiling) {
        (Some(floor), Some(ceiling)) => (floor, ceiling),
        (Some(year), None) | (None, Some(year)) => (year, year),
        (None, None) => return false,
    };
    let from = range.from.map(i64::from);
    let to = range.to.map(i64::from);

    match mode {
        DateSearchType::Overlap => {
            from.is_none_or(|from| ceiling >= from) && to.is_none_or(|to| floor <= to)
        }
        DateSearchType::Included => {
            from.is_none_or(|from| floor >= from) && to.is_none_or(|to| ceiling <= to)
        }
        DateSearchType::Exact => {
            from.is_none_or(|from| floor == from) && to.is_none_or(|to| ceiling == to)
        }
    }
}

/// Evaluates one set of sanitized filters.
pub(super) struct Matcher<'a> {
    table: &'static FieldClassificationTable,
    filters: &'a Filters,
    inverse_management: bool,
}

impl<'a> Matcher<'a> {
    pub(super) fn new(table: &'static FieldClassificationTable, filters: &'a Filters) -> Self {
        let inverse_management = matches!(
            filters.get("management_inverse"),
            Some(FilterValue::Flag(true))
        );
        Self {
            table,
            filters,
            inverse_management,
        }
    }

    /// Returns true if the document passes every filter.
    pub(super) fn matches(&self, document: &Value) -> bool {
        self.filters
            .iter()
            .all(|(key, value)| self.matches_filter(document, key, value))
    }

    fn matches_filter(&self, document: &Value, key: &str, value: &FilterValue) -> bool {
        // modifiers are read by the filters they qualify
        if matches!(self.table.filter_kind(key), Some(FilterKind::Choice { .. }))
            || key == "management_inverse"
        {
            return true;
        }

        let field = document.get(key);
        match value {
            FilterValue::Exact(expected) => field.is_some_and(|field| match field {
                Value::Number(n) => n.to_string() == *expected,
                Value::String(s) => s == expected,
                _ => false,
            }),
            FilterValue::Text(query) => field.is_some_and(|field| {
                text_matches(
                    &text_of(field),
                    query,
                    TextMatchMode::for_filter(self.filters, key),
                )
            }),
            FilterValue::Range(range) => self.table.date_fields.is_some_and(|fields| {
                date_matches(
                    document,
                    fields,
                    *range,
                    DateSearchType::from_filters(self.filters),
                )
            }),
            FilterValue::Nested(wanted) => {
                let present = field.map(ids_of).unwrap_or_default();
                let hit = match NestedOperator::for_filter(self.filters, key) {
                    NestedOperator::Or => wanted.iter().any(|id| present.contains(id)),
                    NestedOperator::And => wanted.iter().all(|id| present.contains(id)),
                };
                if key == "management" && self.inverse_management {
                    !hit
                } else {
                    hit
                }
            }
            FilterValue::Flag(expected) => {
                field.and_then(Value::as_bool).unwrap_or(false) == *expected
            }
        }
    }

    /// Number of free-text term hits; higher ranks first.
    pub(super) fn relevance(&self, document: &Value) -> usize {
        self.filters
            .iter()
            .filter_map(|(key, value)| Some((document.get(key)?, value.as_text()?)))
            .map(|(field, query)| {
                let haystack = text_of(field).to_lowercase();
                query
                    .to_lowercase()
                    .split_whitespace()
                    .map(|term| haystack.matches(term).count())
                    .sum::<usize>()
            })
            .sum()
    }
}
