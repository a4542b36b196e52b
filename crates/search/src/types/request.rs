//! The normalized, engine-agnostic search request.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::params::{ParamValue, RawParams};

/// Default page size.
pub const DEFAULT_LIMIT: usize = 25;

/// Default (1-based) page number.
pub const DEFAULT_PAGE: usize = 1;

/// A year interval used for fuzzy dates.
///
/// Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// Lower bound (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i32>,
    /// Upper bound (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i32>,
}

impl YearRange {
    /// Creates a range from optional bounds.
    pub fn new(from: Option<i32>, to: Option<i32>) -> Self {
        Self { from, to }
    }

    /// Returns true when neither bound is set.
    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// A sanitized filter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FilterValue {
    /// Exact-match scalar (record id or enumerated value).
    Exact(String),
    /// Free-text query; the match mode comes from the companion `*_type` filter.
    Text(String),
    /// Numeric range against the entity's floor/ceiling fields.
    Range(YearRange),
    /// Ids of related entities (city, library, content, person, ...).
    Nested(Vec<u64>),
    /// Boolean flag.
    Flag(bool),
}

impl FilterValue {
    /// Returns the exact value, if any.
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            FilterValue::Exact(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the text value, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested ids, if any.
    pub fn as_nested(&self) -> Option<&[u64]> {
        match self {
            FilterValue::Nested(ids) => Some(ids),
            _ => None,
        }
    }

    /// Converts the value into its raw parameter form.
    pub fn to_param(&self) -> ParamValue {
        match self {
            FilterValue::Exact(s) | FilterValue::Text(s) => ParamValue::Scalar(s.clone()),
            FilterValue::Range(range) => {
                let mut map = BTreeMap::new();
                if let Some(from) = range.from {
                    map.insert("from".to_string(), ParamValue::Scalar(from.to_string()));
                }
                if let Some(to) = range.to {
                    map.insert("to".to_string(), ParamValue::Scalar(to.to_string()));
                }
                ParamValue::Map(map)
            }
            FilterValue::Nested(ids) => {
                ParamValue::List(ids.iter().map(|id| id.to_string()).collect())
            }
            FilterValue::Flag(flag) => ParamValue::Scalar(if *flag { "1" } else { "0" }.to_string()),
        }
    }
}

/// Sanitized filters keyed by filter name.
pub type Filters = BTreeMap<String, FilterValue>;

/// How a free-text filter is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatchMode {
    /// Any of the terms.
    #[default]
    Any,
    /// All of the terms.
    All,
    /// The terms as one phrase.
    Phrase,
}

impl TextMatchMode {
    /// Accepted wire values.
    pub const VALUES: &'static [&'static str] = &["any", "all", "phrase"];

    /// Parses a wire value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "any" => Some(TextMatchMode::Any),
            "all" => Some(TextMatchMode::All),
            "phrase" => Some(TextMatchMode::Phrase),
            _ => None,
        }
    }

    /// Returns the text mode configured for `text_key` in `filters`.
    pub fn for_filter(filters: &Filters, text_key: &str) -> Self {
        filters
            .get(&format!("{text_key}_type"))
            .and_then(FilterValue::as_exact)
            .and_then(Self::parse)
            .unwrap_or_default()
    }
}

impl fmt::Display for TextMatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatchMode::Any => write!(f, "any"),
            TextMatchMode::All => write!(f, "all"),
            TextMatchMode::Phrase => write!(f, "phrase"),
        }
    }
}

/// How a date range is compared with a record's floor/ceiling interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateSearchType {
    /// Record interval intersects the requested range.
    #[default]
    Overlap,
    /// Record interval lies within the requested range.
    Included,
    /// Record interval equals the requested range.
    Exact,
}

impl DateSearchType {
    /// Accepted wire values.
    pub const VALUES: &'static [&'static str] = &["overlap", "included", "exact"];

    /// Parses a wire value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "overlap" => Some(DateSearchType::Overlap),
            "included" => Some(DateSearchType::Included),
            "exact" => Some(DateSearchType::Exact),
            _ => None,
        }
    }

    /// Returns the date search type configured in `filters`.
    pub fn from_filters(filters: &Filters) -> Self {
        filters
            .get("date_search_type")
            .and_then(FilterValue::as_exact)
            .and_then(Self::parse)
            .unwrap_or_default()
    }
}

/// Combination mode for multi-valued nested filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestedOperator {
    /// Match records carrying any of the ids.
    #[default]
    Or,
    /// Match records carrying all of the ids.
    And,
}

impl NestedOperator {
    /// Accepted wire values.
    pub const VALUES: &'static [&'static str] = &["or", "and"];

    /// Returns the operator configured for `key` (`{key}_op`).
    pub fn for_filter(filters: &Filters, key: &str) -> Self {
        match filters
            .get(&format!("{key}_op"))
            .and_then(FilterValue::as_exact)
        {
            Some("and") => NestedOperator::And,
            _ => NestedOperator::Or,
        }
    }
}

/// A sanitized search request.
///
/// Built by [`FilterSanitizer`](crate::sanitize::FilterSanitizer) and handed
/// as-is to a [`SearchEngine`](crate::core::SearchEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Page size.
    pub limit: usize,
    /// 1-based page number.
    pub page: usize,
    /// Field paths to sort on; empty means relevance order.
    pub order_by: Vec<String>,
    /// Sort direction.
    pub ascending: bool,
    /// Sanitized filters.
    pub filters: Filters,
    /// The logical `orderBy` name that produced `order_by`, if one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
            order_by: Vec::new(),
            ascending: true,
            filters: Filters::new(),
            sort_key: None,
        }
    }
}

impl SearchRequest {
    /// Number of records to skip.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Returns true if relevance ranking decides the order.
    pub fn uses_relevance_order(&self) -> bool {
        self.order_by.is_empty()
    }

    /// Serializes the request back into raw parameters.
    ///
    /// Feeding the result through the sanitizer again yields an equal
    /// request.
    pub fn to_params(&self) -> RawParams {
        let mut params = RawParams::new();
        params.insert("limit", ParamValue::Scalar(self.limit.to_string()));
        params.insert("page", ParamValue::Scalar(self.page.to_string()));
        if let Some(sort_key) = &self.sort_key {
            params.insert("orderBy", ParamValue::Scalar(sort_key.clone()));
            params.insert(
                "ascending",
                ParamValue::Scalar(if self.ascending { "1" } else { "0" }.to_string()),
            );
        }
        if !self.filters.is_empty() {
            let filters = self
                .filters
                .iter()
                .map(|(key, value)| (key.clone(), value.to_param()))
                .collect();
            params.insert("filters", ParamValue::Map(filters));
        }
        params
    }
}
