//! Boundary traits of the search layer.
//!
//! - [`SearchEngine`] - executes sanitized requests and facet aggregations
//! - [`ObjectStore`] - id-based record lookups used outside of search
//!
//! Both are implemented by
//! [`MemoryEngine`](crate::backends::memory::MemoryEngine); the
//! Elasticsearch backend implements [`SearchEngine`] only.

mod search;
mod store;

pub use search::SearchEngine;
pub use store::ObjectStore;
