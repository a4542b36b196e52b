//! [`SearchEngine`] implementation for the in-memory backend.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::core::SearchEngine;
use crate::entity::EntityKind;
use crate::error::SearchResult;
use crate::types::{AggregationBucket, AggregationResult, Filters, SearchPage, SearchRequest};

use super::backend::{BACKEND_NAME, MemoryEngine};
use super::matcher::{Matcher, lookup};

#[async_trait]
impl SearchEngine for MemoryEngine {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn search(
        &self,
        entity: EntityKind,
        request: &SearchRequest,
    ) -> SearchResult<SearchPage> {
        let matcher = Matcher::new(entity.table(), &request.filters);
        let mut hits: Vec<Value> = self
            .documents(entity)
            .into_iter()
            .filter(|doc| matcher.matches(doc))
            .collect();

        if request.uses_relevance_order() {
            // stable sort keeps id order among equal scores
            hits.sort_by_cached_key(|doc| std::cmp::Reverse(matcher.relevance(doc)));
        } else {
            hits.sort_by(|a, b| compare_documents(a, b, &request.order_by, request.ascending));
        }

        let count = hits.len() as u64;
        let data: Vec<Value> = hits
            .into_iter()
            .skip(request.offset())
            .take(request.limit)
            .collect();

        debug!(
            entity = %entity,
            count,
            returned = data.len(),
            page = request.page,
            "Memory search complete"
        );
        Ok(SearchPage::new(data, count))
    }

    async fn aggregate(
        &self,
        entity: EntityKind,
        fields: &[&str],
        filters: &Filters,
    ) -> SearchResult<AggregationResult> {
        let table = entity.table();
        let documents = self.documents(entity);
        let mut result = AggregationResult::new();

        for field in fields {
            // a facet never filters out its own alternatives
            let mut reduced = filters.clone();
            reduced.remove(*field);
            reduced.remove(&format!("{field}_op"));
            let matcher = Matcher::new(table, &reduced);

            let mut buckets: BTreeMap<u64, AggregationBucket> = BTreeMap::new();
            for doc in documents.iter().filter(|doc| matcher.matches(doc)) {
                let Some(value) = doc.get(*field) else {
                    continue;
                };
                let mut seen = Vec::new();
                for (id, name) in named_ids(value) {
                    if seen.contains(&id) {
                        continue;
                    }
                    seen.push(id);
                    buckets
                        .entry(id)
                        .or_insert_with(|| AggregationBucket::new(id, name, 0))
                        .count += 1;
                }
            }

            let mut buckets: Vec<AggregationBucket> = buckets.into_values().collect();
            buckets.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then(a.id.cmp(&b.id))
            });
            result.insert(field.to_string(), buckets);
        }

        Ok(result)
    }
}

fn named_ids(value: &Value) -> Vec<(u64, String)> {
    match value {
        Value::Object(map) => map
            .get("id")
            .and_then(Value::as_u64)
            .map(|id| {
                let name = map
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                (id, name)
            })
            .into_iter()
            .collect(),
        Value::Array(items) => items.iter().flat_map(named_ids).collect(),
        _ => Vec::new(),
    }
}

/// Orders two documents by the given field paths. Missing values sort last
/// in both directions.
fn compare_documents(a: &Value, b: &Value, fields: &[String], ascending: bool) -> Ordering {
    for field in fields {
        let ordering = match (lookup(a, field), lookup(b, field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => {
                let ordering = compare_values(left, right);
                if ascending { ordering } else { ordering.reverse() }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
