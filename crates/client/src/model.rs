//! Form model and outgoing queries.

use std::collections::BTreeMap;

use dbbe_search::types::{AggregationBucket, ParamValue, RawParams};
use serde::{Deserialize, Serialize};

/// A selected related entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Id of the related entity.
    pub id: u64,
    /// Display name.
    pub name: String,
}

impl Item {
    /// Creates an item.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<&AggregationBucket> for Item {
    fn from(bucket: &AggregationBucket) -> Self {
        Item::new(bucket.id, bucket.name.clone())
    }
}

/// The current value of one form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Nothing entered or selected.
    #[default]
    Empty,
    /// Raw text, also used for year inputs before they are parsed.
    Text(String),
    /// A parsed year.
    Year(i32),
    /// Checkbox state.
    Flag(bool),
    /// Single selection.
    Item(Item),
    /// Multiple selection.
    Items(Vec<Item>),
}

impl FieldValue {
    /// Returns true for values that must not be sent as a filter.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Items(items) => items.is_empty(),
            FieldValue::Year(_) | FieldValue::Flag(_) | FieldValue::Item(_) => false,
        }
    }

    /// Number of selected items (0 or 1 for single values).
    pub fn selection_len(&self) -> usize {
        match self {
            FieldValue::Items(items) => items.len(),
            FieldValue::Item(_) => 1,
            _ => 0,
        }
    }

    /// Returns the year, parsing text input if needed.
    ///
    /// `Err(())` means the input is not a number.
    pub fn year(&self) -> Result<Option<i32>, ()> {
        match self {
            FieldValue::Year(year) => Ok(Some(*year)),
            FieldValue::Text(text) if text.trim().is_empty() => Ok(None),
            FieldValue::Text(text) => text.trim().parse().map(Some).map_err(|_| ()),
            FieldValue::Empty => Ok(None),
            _ => Err(()),
        }
    }

    /// Converts the value into a filter parameter.
    pub fn to_param(&self) -> Option<ParamValue> {
        if self.is_empty() {
            return None;
        }
        let param = match self {
            FieldValue::Text(text) => ParamValue::Scalar(text.trim().to_string()),
            FieldValue::Year(year) => ParamValue::Scalar(year.to_string()),
            FieldValue::Flag(flag) => ParamValue::Scalar(if *flag { "1" } else { "0" }.into()),
            FieldValue::Item(item) => ParamValue::Scalar(item.id.to_string()),
            FieldValue::Items(items) => {
                ParamValue::List(items.iter().map(|i| i.id.to_string()).collect())
            }
            FieldValue::Empty => return None,
        };
        Some(param)
    }
}

/// Values of every field of a search form, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchModel {
    values: BTreeMap<String, FieldValue>,
}

impl SearchModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a field; missing fields are empty.
    pub fn get(&self, key: &str) -> &FieldValue {
        const EMPTY: &FieldValue = &FieldValue::Empty;
        self.values.get(key).unwrap_or(EMPTY)
    }

    /// Sets a field, removing it when the value is empty.
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        if matches!(value, FieldValue::Empty) {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    /// Clears a field.
    pub fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Returns true if the field has a non-empty value.
    pub fn has_value(&self, key: &str) -> bool {
        !self.get(key).is_empty()
    }

    /// Iterates over the set fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }
}

/// What the client sends to `search_api`.
///
/// Built fresh for each interaction and never changed after it is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Page size.
    pub limit: usize,
    /// 1-based page.
    pub page: usize,
    /// Logical sort name; `None` leaves ordering to the server.
    pub order_by: Option<String>,
    /// Sort direction.
    pub ascending: bool,
    /// Filters by key.
    pub filters: BTreeMap<String, ParamValue>,
}

impl SearchQuery {
    /// Converts the query into bracketed parameters.
    pub fn to_params(&self) -> RawParams {
        let mut params = RawParams::new();
        params.insert("limit", ParamValue::Scalar(self.limit.to_string()));
        params.insert("page", ParamValue::Scalar(self.page.to_string()));
        if let Some(order_by) = &self.order_by {
            params.insert("orderBy", ParamValue::Scalar(order_by.clone()));
            params.insert(
                "ascending",
                ParamValue::Scalar(if self.ascending { "1" } else { "0" }.to_string()),
            );
        }
        if !self.filters.is_empty() {
            params.insert("filters", ParamValue::Map(self.filters.clone()));
        }
        params
    }

    /// Serializes the query; equal queries give byte-equal strings.
    pub fn to_query_string(&self) -> String {
        self.to_params().to_query_string()
    }
}
