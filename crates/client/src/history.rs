//! URL and session history.
//!
//! The address bar mirrors the query of the result on screen so results
//! can be bookmarked and the back button works. [`SessionHistorySync`]
//! writes the query after every result and reads it back into a form
//! state when the page loads or the user navigates through history.
//!
//! Browser state sits behind [`HistoryBackend`] and [`SessionStorage`];
//! [`MemoryHistory`] and [`MemorySessionStorage`] keep it in memory.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dbbe_search::types::{
    AggregationBucket, AggregationResult, ParamValue, RawParams, SearchResponse,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::coordinator::RestoredState;
use crate::model::{FieldValue, Item, SearchModel, SearchQuery};
use crate::schema::{FieldKind, RangeBound, SearchSchema};

/// The browser's session history.
pub trait HistoryBackend: Send + Sync {
    /// Query string of the current entry, without the leading `?`.
    fn current_query(&self) -> String;

    /// Adds an entry.
    fn push(&self, query: &str);

    /// Replaces the current entry.
    fn replace(&self, query: &str);
}

/// Per-tab key/value storage.
pub trait SessionStorage: Send + Sync {
    /// Stores a value.
    fn set(&self, key: &str, value: String);

    /// Reads a value.
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default)]
struct HistoryEntries {
    entries: Vec<String>,
    index: usize,
}

/// In-memory session history with back and forward navigation.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<HistoryEntries>,
}

impl MemoryHistory {
    /// Starts with a single entry for `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(HistoryEntries {
                entries: vec![query.into()],
                index: 0,
            }),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns true if there are no entries. Never the case once created.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Moves one entry back and returns its query.
    pub fn back(&self) -> Option<String> {
        let mut inner = self.inner.lock();
        if inner.index == 0 {
            return None;
        }
        inner.index -= 1;
        Some(inner.entries[inner.index].clone())
    }

    /// Moves one entry forward and returns its query.
    pub fn forward(&self) -> Option<String> {
        let mut inner = self.inner.lock();
        if inner.index + 1 >= inner.entries.len() {
            return None;
        }
        inner.index += 1;
        Some(inner.entries[inner.index].clone())
    }
}

impl HistoryBackend for MemoryHistory {
    fn current_query(&self) -> String {
        let inner = self.inner.lock();
        inner.entries.get(inner.index).cloned().unwrap_or_default()
    }

    fn push(&self, query: &str) {
        let mut inner = self.inner.lock();
        let keep = inner.index + 1;
        inner.entries.truncate(keep);
        inner.entries.push(query.to_string());
        inner.index = inner.entries.len() - 1;
    }

    fn replace(&self, query: &str) {
        let mut inner = self.inner.lock();
        let index = inner.index;
        match inner.entries.get_mut(index) {
            Some(entry) => *entry = query.to_string(),
            None => inner.entries.push(query.to_string()),
        }
    }
}

/// In-memory session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn set(&self, key: &str, value: String) {
        self.values.lock().insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

/// What caused the result about to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOrigin {
    /// The first result of the page; the URL is replaced.
    Initial,
    /// An edit by the user; a new history entry is pushed.
    UserChange,
    /// Back/forward navigation; the URL is already right.
    HistoryPop,
}

/// Stored after every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Parameters of the query that produced the result.
    pub params: RawParams,
    /// Number of matching records.
    pub count: u64,
    /// Time of the result in milliseconds; changes on every write.
    pub hash: i64,
}

/// Keeps the URL and session storage in line with the result on screen.
pub struct SessionHistorySync {
    schema: &'static SearchSchema,
    history: Arc<dyn HistoryBackend>,
    storage: Arc<dyn SessionStorage>,
    origin: NavigationOrigin,
}

impl std::fmt::Debug for SessionHistorySync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHistorySync")
            .field("entity", &self.schema.entity)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl SessionHistorySync {
    /// Creates the sync for one search page.
    pub fn new(
        schema: &'static SearchSchema,
        history: Arc<dyn HistoryBackend>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            schema,
            history,
            storage,
            origin: NavigationOrigin::Initial,
        }
    }

    /// Storage key of this page's entry.
    pub fn storage_key(&self) -> String {
        format!("dbbe_search_{}", self.schema.entity.path())
    }

    /// Starts over as if the page was just loaded.
    pub fn init(&mut self) {
        self.origin = NavigationOrigin::Initial;
    }

    /// Returns the origin of the next result.
    pub fn origin(&self) -> NavigationOrigin {
        self.origin
    }

    /// Marks the next result as coming from back/forward navigation.
    pub fn on_history_pop(&mut self) {
        self.origin = NavigationOrigin::HistoryPop;
    }

    /// Records a result that never arrived.
    pub fn on_error(&mut self) {
        if self.origin == NavigationOrigin::HistoryPop {
            self.origin = NavigationOrigin::UserChange;
        }
    }

    /// Returns the stored entry, if any.
    pub fn stored(&self) -> Option<SessionEntry> {
        let raw = self.storage.get(&self.storage_key())?;
        serde_json::from_str(&raw)
            .map_err(|err| tracing::warn!(error = %err, "Ignoring unreadable session entry"))
            .ok()
    }

    /// Records a result produced by `query`.
    pub fn on_data(&mut self, response: &SearchResponse, query: &SearchQuery) {
        let params = query.to_params();
        let serialized = params.to_query_string();
        let entry = SessionEntry {
            params,
            count: response.count,
            hash: Utc::now().timestamp_millis(),
        };
        match serde_json::to_string(&entry) {
            Ok(json) => self.storage.set(&self.storage_key(), json),
            Err(err) => tracing::warn!(error = %err, "Could not store session entry"),
        }

        match self.origin {
            NavigationOrigin::Initial => self.history.replace(&serialized),
            NavigationOrigin::UserChange => {
                if self.history.current_query() != serialized {
                    self.history.push(&serialized);
                }
            }
            NavigationOrigin::HistoryPop => {}
        }
        tracing::debug!(origin = ?self.origin, query = %serialized, "Recorded search result");
        self.origin = NavigationOrigin::UserChange;
    }

    /// Reads the current URL into a form state.
    pub fn init_from_url(&self, aggregation: &AggregationResult) -> RestoredState {
        self.init_from_query(&self.history.current_query(), aggregation)
    }

    /// Reads a query string into a form state.
    ///
    /// Selected ids are resolved against `aggregation`; ids it no longer
    /// offers are left out. The sort is taken from `orderBy`, else left to
    /// relevance when a free-text filter is present, else the entity default.
    pub fn init_from_query(&self, query: &str, aggregation: &AggregationResult) -> RestoredState {
        let params = RawParams::parse_query(query);
        let mut model = SearchModel::new();

        if let Some(filters) = params.get("filters").and_then(ParamValue::as_map) {
            for (key, value) in filters {
                if key == "date" {
                    restore_years(self.schema, value, &mut model);
                    continue;
                }
                let Some(field) = self.schema.field(key) else {
                    continue;
                };
                let restored = match field.kind {
                    FieldKind::Nested { multiple } => {
                        let items = resolve_items(value, aggregation.get(field.key).map(Vec::as_slice));
                        if multiple {
                            FieldValue::Items(items)
                        } else {
                            items.into_iter().next().map_or(FieldValue::Empty, FieldValue::Item)
                        }
                    }
                    FieldKind::Boolean => match value.as_scalar() {
                        Some("1") | Some("true") => FieldValue::Flag(true),
                        Some("0") | Some("false") => FieldValue::Flag(false),
                        _ => FieldValue::Empty,
                    },
                    FieldKind::Year(_) => value
                        .as_scalar()
                        .and_then(|year| year.trim().parse().ok())
                        .map_or(FieldValue::Empty, FieldValue::Year),
                    FieldKind::Text | FieldKind::Exact | FieldKind::Toggle { .. } => value
                        .as_scalar()
                        .map_or(FieldValue::Empty, |text| FieldValue::Text(text.to_string())),
                };
                if !restored.is_empty() {
                    model.set(field.key, restored);
                }
            }
        }

        let page = params
            .get_str("page")
            .and_then(|page| page.parse::<usize>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);

        let (order_by, ascending) = match params.get_str("orderBy") {
            Some(order_by) => (
                Some(order_by.to_string()),
                params.get_str("ascending") != Some("0"),
            ),
            None if self
                .schema
                .fields
                .iter()
                .any(|f| self.schema.suppresses_sort(f.key) && model.has_value(f.key)) =>
            {
                (None, true)
            }
            None => (Some(self.schema.default_order().to_string()), true),
        };

        RestoredState {
            model,
            page,
            order_by,
            ascending,
        }
    }
}

fn restore_years(schema: &SearchSchema, value: &ParamValue, model: &mut SearchModel) {
    let Some(range) = value.as_map() else {
        return;
    };
    for field in schema.fields {
        let FieldKind::Year(bound) = field.kind else {
            continue;
        };
        let side = match bound {
            RangeBound::From => "from",
            RangeBound::To => "to",
        };
        if let Some(year) = range
            .get(side)
            .and_then(ParamValue::as_scalar)
            .and_then(|year| year.trim().parse().ok())
        {
            model.set(field.key, FieldValue::Year(year));
        }
    }
}

fn resolve_items(
    value: &ParamValue,
    buckets: Option<&[AggregationBucket]>,
) -> Vec<Item> {
    let Some(buckets) = buckets else {
        return Vec::new();
    };
    value
        .values()
        .into_iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .filter_map(|id| buckets.iter().find(|bucket| bucket.id == id))
        .map(Item::from)
        .collect()
}
