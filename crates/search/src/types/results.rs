//! Search results and aggregation buckets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One candidate value of a facet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregationBucket {
    /// Id of the related entity.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Number of matching records carrying this value.
    #[serde(default)]
    pub count: u64,
}

impl AggregationBucket {
    /// Creates a bucket.
    pub fn new(id: u64, name: impl Into<String>, count: u64) -> Self {
        Self {
            id,
            name: name.into(),
            count,
        }
    }
}

/// Facet candidates keyed by field.
pub type AggregationResult = BTreeMap<String, Vec<AggregationBucket>>;

/// One page of hits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// The records on this page.
    pub data: Vec<Value>,
    /// Total number of matching records.
    pub count: u64,
}

impl SearchPage {
    /// Creates a page.
    pub fn new(data: Vec<Value>, count: u64) -> Self {
        Self { data, count }
    }

    /// An empty page.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// What the search API returns: a page plus the facet buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The records on this page.
    pub data: Vec<Value>,
    /// Total number of matching records.
    pub count: u64,
    /// Facet candidates for the current filters.
    #[serde(default)]
    pub aggregation: AggregationResult,
}

impl SearchResponse {
    /// Combines a page with its aggregation.
    pub fn new(page: SearchPage, aggregation: AggregationResult) -> Self {
        Self {
            data: page.data,
            count: page.count,
            aggregation,
        }
    }
}

/// `{id, name}` pair used by short listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortRecord {
    /// Record id.
    pub id: u64,
    /// Display name.
    pub name: String,
}
