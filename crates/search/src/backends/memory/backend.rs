//! Document storage for the in-memory backend.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::ObjectStore;
use crate::entity::EntityKind;
use crate::error::{SearchError, SearchResult};
use crate::types::ShortRecord;

use super::matcher::ids_of;

pub(super) const BACKEND_NAME: &str = "memory";

/// In-memory search engine and object store.
#[derive(Default)]
pub struct MemoryEngine {
    records: RwLock<HashMap<EntityKind, BTreeMap<u64, Value>>>,
}

impl Debug for MemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let records = self.records.read();
        let counts: BTreeMap<EntityKind, usize> =
            records.iter().map(|(kind, docs)| (*kind, docs.len())).collect();
        f.debug_struct("MemoryEngine")
            .field("records", &counts)
            .finish()
    }
}

impl MemoryEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads documents from a JSON file.
    ///
    /// The file holds one array of documents per entity path:
    /// `{"manuscripts": [...], "persons": [...]}`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SearchResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::backend(
                BACKEND_NAME,
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;
        let value: Value = serde_json::from_str(&content)?;
        let engine = Self::new();
        let loaded = engine.load_json(&value)?;
        info!(path = %path.display(), documents = loaded, "Loaded search documents");
        Ok(engine)
    }

    /// Inserts or replaces a document. Returns its id.
    ///
    /// # Errors
    ///
    /// * `SearchError::InvalidDocument` - if the document has no numeric `id`
    pub fn insert(&self, entity: EntityKind, document: Value) -> SearchResult<u64> {
        let id = document
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchError::InvalidDocument {
                message: format!("{} document without a numeric id", entity),
            })?;
        self.records
            .write()
            .entry(entity)
            .or_default()
            .insert(id, document);
        Ok(id)
    }

    /// Loads a `{entity path: [documents]}` object. Returns the number of
    /// documents inserted.
    pub fn load_json(&self, value: &Value) -> SearchResult<usize> {
        let object = value.as_object().ok_or_else(|| SearchError::InvalidDocument {
            message: "expected an object keyed by entity path".to_string(),
        })?;

        let mut loaded = 0;
        for (path, documents) in object {
            let entity = EntityKind::from_path(path).ok_or_else(|| SearchError::UnknownEntity {
                name: path.clone(),
            })?;
            let documents = documents
                .as_array()
                .ok_or_else(|| SearchError::InvalidDocument {
                    message: format!("{} must be an array", path),
                })?;
            for document in documents {
                self.insert(entity, document.clone())?;
                loaded += 1;
            }
            debug!(entity = %entity, count = documents.len(), "Loaded documents");
        }
        Ok(loaded)
    }

    /// Number of documents of a type.
    pub fn len(&self, entity: EntityKind) -> usize {
        self.records.read().get(&entity).map_or(0, BTreeMap::len)
    }

    /// Returns true if no documents are stored at all.
    pub fn is_empty(&self) -> bool {
        self.records.read().values().all(BTreeMap::is_empty)
    }

    /// Clones the documents of a type in id order.
    pub(super) fn documents(&self, entity: EntityKind) -> Vec<Value> {
        self.records
            .read()
            .get(&entity)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }
}

/// The display name of a document: `name`, `incipit` or `title`.
pub(super) fn display_name(document: &Value) -> String {
    ["name", "incipit", "title"]
        .iter()
        .find_map(|key| document.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn references(document: &Value, entity: EntityKind, id: u64) -> bool {
    let singular = entity.to_string();
    [singular.as_str(), entity.path()]
        .iter()
        .filter_map(|key| document.get(*key))
        .any(|value| ids_of(value).contains(&id))
}

#[async_trait]
impl ObjectStore for MemoryEngine {
    async fn get_full(&self, entity: EntityKind, id: u64) -> SearchResult<Value> {
        self.records
            .read()
            .get(&entity)
            .and_then(|docs| docs.get(&id))
            .cloned()
            .ok_or_else(|| SearchError::not_found(entity, id))
    }

    async fn get_all_short(&self, entity: EntityKind) -> SearchResult<Vec<ShortRecord>> {
        let mut records: Vec<ShortRecord> = self
            .documents(entity)
            .iter()
            .filter_map(|doc| {
                let id = doc.get("id").and_then(Value::as_u64)?;
                Some(ShortRecord {
                    id,
                    name: display_name(doc),
                })
            })
            .collect();
        records.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(records)
    }

    async fn get_dependencies(
        &self,
        entity: EntityKind,
        id: u64,
        related: EntityKind,
    ) -> SearchResult<Vec<Value>> {
        let records = self.records.read();
        if !records.get(&entity).is_some_and(|docs| docs.contains_key(&id)) {
            return Err(SearchError::not_found(entity, id));
        }
        Ok(records
            .get(&related)
            .map(|docs| {
                docs.values()
                    .filter(|doc| references(doc, entity, id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
