//! In-process backend over JSON documents.
//!
//! Documents are stored per entity type exactly as a search index would
//! hold them: related entities as `{id, name}` objects (or arrays of them),
//! fuzzy dates as floor/ceiling year numbers, flags as booleans.
//!
//! ```json
//! {
//!   "id": 12,
//!   "name": "Vaticanus gr. 1",
//!   "city": {"id": 3, "name": "Vatican City"},
//!   "content": [{"id": 7, "name": "Gospels"}],
//!   "date_floor_year": 1100,
//!   "date_ceiling_year": 1150,
//!   "public": true
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use dbbe_search::backends::memory::MemoryEngine;
//! use dbbe_search::entity::EntityKind;
//! use serde_json::json;
//!
//! let engine = MemoryEngine::new();
//! engine.insert(EntityKind::Manuscript, json!({"id": 1, "name": "Athos 12"})).unwrap();
//! assert_eq!(engine.len(EntityKind::Manuscript), 1);
//! ```

mod backend;
mod matcher;
mod search_impl;

pub use backend::MemoryEngine;
