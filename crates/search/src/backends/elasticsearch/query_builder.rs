//! Elasticsearch Query DSL builder.
//!
//! Translates a sanitized [`SearchRequest`] into a search body and facet
//! field lists into aggregation bodies, and parses the responses back.

use serde_json::{Map, Value, json};

use crate::entity::{FieldClassificationTable, FilterKind};
use crate::types::{
    AggregationBucket, AggregationResult, DateSearchType, FilterValue, Filters, NestedOperator,
    SearchPage, SearchRequest, TextMatchMode, YearRange,
};

/// Upper bound on facet buckets per field.
const MAX_BUCKETS: usize = 10_000;

/// A complete Elasticsearch request body ready to be sent.
#[derive(Debug, Clone)]
pub struct EsQuery {
    /// The request body.
    pub body: Value,
    /// The index to search.
    pub index: String,
}

/// Builds Elasticsearch queries for one entity type.
pub struct EsQueryBuilder {
    table: &'static FieldClassificationTable,
    index: String,
}

impl EsQueryBuilder {
    /// Creates a builder targeting `index`.
    pub fn new(table: &'static FieldClassificationTable, index: impl Into<String>) -> Self {
        Self {
            table,
            index: index.into(),
        }
    }

    /// Builds the search body for a request.
    pub fn build(&self, request: &SearchRequest) -> EsQuery {
        let mut body = json!({
            "query": self.build_query(&request.filters),
            "from": request.offset(),
            "size": request.limit,
            "track_total_hits": true,
        });
        body["sort"] = self.build_sort(request);

        EsQuery {
            body,
            index: self.index.clone(),
        }
    }

    /// Builds a size-0 aggregation body for `fields`.
    ///
    /// Each field is aggregated under the filters minus its own, so the
    /// buckets list every alternative the user could switch to.
    pub fn build_aggregation(&self, fields: &[&str], filters: &Filters) -> EsQuery {
        let mut aggs = Map::new();
        for field in fields {
            let mut reduced = filters.clone();
            reduced.remove(*field);
            reduced.remove(&format!("{field}_op"));

            aggs.insert(
                field.to_string(),
                json!({
                    "filter": self.build_query(&reduced),
                    "aggs": {
                        "nested": {
                            "nested": { "path": field },
                            "aggs": {
                                "id": {
                                    "terms": { "field": format!("{field}.id"), "size": MAX_BUCKETS },
                                    "aggs": {
                                        "name": {
                                            "terms": { "field": format!("{field}.name.keyword"), "size": 1 }
                                        },
                                        "parents": { "reverse_nested": {} }
                                    }
                                }
                            }
                        }
                    }
                }),
            );
        }

        EsQuery {
            body: json!({ "size": 0, "aggs": Value::Object(aggs) }),
            index: self.index.clone(),
        }
    }

    /// Builds the `bool` query for a set of filters.
    pub fn build_query(&self, filters: &Filters) -> Value {
        let mut must = Vec::new();
        let mut filter = Vec::new();
        let mut must_not = Vec::new();
        let inverse_management = matches!(
            filters.get("management_inverse"),
            Some(FilterValue::Flag(true))
        );

        for (key, value) in filters {
            if matches!(self.table.filter_kind(key), Some(FilterKind::Choice { .. }))
                || key == "management_inverse"
            {
                continue;
            }

            match value {
                FilterValue::Text(query) => {
                    must.push(text_clause(key, query, TextMatchMode::for_filter(filters, key)));
                }
                FilterValue::Exact(value) => {
                    let value = value
                        .parse::<u64>()
                        .map(Value::from)
                        .unwrap_or_else(|_| Value::from(value.as_str()));
                    filter.push(json!({ "term": { key: value } }));
                }
                FilterValue::Range(range) => {
                    if let Some(clause) = self.date_clause(*range, DateSearchType::from_filters(filters)) {
                        filter.push(clause);
                    }
                }
                FilterValue::Nested(ids) => {
                    let clause = nested_clause(key, ids, NestedOperator::for_filter(filters, key));
                    if key == "management" && inverse_management {
                        must_not.push(clause);
                    } else {
                        filter.push(clause);
                    }
                }
                FilterValue::Flag(flag) => {
                    filter.push(json!({ "term": { key: flag } }));
                }
            }
        }

        let mut bool_query = Map::new();
        for (occur, clauses) in [("must", must), ("filter", filter), ("must_not", must_not)] {
            if !clauses.is_empty() {
                bool_query.insert(occur.to_string(), Value::Array(clauses));
            }
        }
        if bool_query.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "bool": bool_query })
        }
    }

    fn build_sort(&self, request: &SearchRequest) -> Value {
        if request.uses_relevance_order() {
            return json!(["_score", { "id": { "order": "asc" } }]);
        }
        let order = if request.ascending { "asc" } else { "desc" };
        let mut sort: Vec<Value> = request
            .order_by
            .iter()
            .map(|field| json!({ field: { "order": order, "missing": "_last" } }))
            .collect();
        sort.push(json!({ "id": { "order": "asc" } }));
        Value::Array(sort)
    }

    fn date_clause(&self, range: YearRange, mode: DateSearchType) -> Option<Value> {
        let fields = self.table.date_fields?;
        let (floor, ceiling) = (fields.floor, fields.ceiling);
        let mut clauses = Vec::new();

        match mode {
            DateSearchType::Overlap => {
                if let Some(from) = range.from {
                    clauses.push(json!({ "range": { ceiling: { "gte": from } } }));
                }
                if let Some(to) = range.to {
                    clauses.push(json!({ "range": { floor: { "lte": to } } }));
                }
            }
            DateSearchType::Included => {
                if let Some(from) = range.from {
                    clauses.push(json!({ "range": { floor: { "gte": from } } }));
                }
                if let Some(to) = range.to {
                    clauses.push(json!({ "range": { ceiling: { "lte": to } } }));
                }
            }
            DateSearchType::Exact => {
                if let Some(from) = range.from {
                    clauses.push(json!({ "term": { floor: from } }));
                }
                if let Some(to) = range.to {
                    clauses.push(json!({ "term": { ceiling: to } }));
                }
            }
        }

        match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(json!({ "bool": { "filter": clauses } })),
        }
    }
}

fn text_clause(field: &str, query: &str, mode: TextMatchMode) -> Value {
    match mode {
        TextMatchMode::Any => json!({ "match": { field: { "query": query, "operator": "or" } } }),
        TextMatchMode::All => json!({ "match": { field: { "query": query, "operator": "and" } } }),
        TextMatchMode::Phrase => json!({ "match_phrase": { field: query } }),
    }
}

fn nested_clause(field: &str, ids: &[u64], operator: NestedOperator) -> Value {
    let id_field = format!("{field}.id");
    match operator {
        NestedOperator::Or => json!({
            "nested": { "path": field, "query": { "terms": { id_field: ids } } }
        }),
        NestedOperator::And => {
            let clauses: Vec<Value> = ids
                .iter()
                .map(|id| {
                    json!({
                        "nested": { "path": field, "query": { "term": { id_field.as_str(): id } } }
                    })
                })
                .collect();
            json!({ "bool": { "filter": clauses } })
        }
    }
}

/// Extracts the `_source` documents and the total from a search response.
pub fn parse_search_response(body: &Value) -> SearchPage {
    let data = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source").cloned())
                .collect()
        })
        .unwrap_or_default();
    let count = body
        .pointer("/hits/total/value")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    SearchPage::new(data, count)
}

/// Turns an aggregation response into facet buckets, sorted by name.
pub fn parse_aggregation_response(body: &Value, fields: &[&str]) -> AggregationResult {
    let mut result = AggregationResult::new();
    for field in fields {
        let mut buckets: Vec<AggregationBucket> = body
            .pointer(&format!("/aggregations/{field}/nested/id/buckets"))
            .and_then(Value::as_array)
            .map(|buckets| buckets.iter().filter_map(parse_bucket).collect())
            .unwrap_or_default();
        buckets.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        result.insert(field.to_string(), buckets);
    }
    result
}

fn parse_bucket(bucket: &Value) -> Option<AggregationBucket> {
    let id = bucket.get("key").and_then(Value::as_u64)?;
    let name = bucket
        .pointer("/name/buckets/0/key")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let count = bucket
        .pointer("/parents/doc_count")
        .or_else(|| bucket.get("doc_count"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    Some(AggregationBucket::new(id, name, count))
}
