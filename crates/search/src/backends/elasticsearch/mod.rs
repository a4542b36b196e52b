//! Elasticsearch backend.
//!
//! The query DSL translation in [`query_builder`] is always compiled so it
//! can be tested without a cluster. The live [`ElasticsearchEngine`] needs
//! the `elasticsearch` feature.
//!
//! # Index Structure
//!
//! One index per entity type, named `{prefix}_{entity path}`
//! (e.g., `dbbe_manuscripts`). Related entities are mapped as `nested`
//! objects carrying `id` and `name`, fuzzy dates as floor/ceiling integers.
//!
//! # Example
//!
//! ```ignore
//! use dbbe_search::backends::elasticsearch::{ElasticsearchConfig, ElasticsearchEngine};
//!
//! let config = ElasticsearchConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     ..Default::default()
//! };
//! let engine = ElasticsearchEngine::new(config)?;
//! ```

pub mod query_builder;

#[cfg(feature = "elasticsearch")]
mod backend;
#[cfg(feature = "elasticsearch")]
mod search_impl;

#[cfg(feature = "elasticsearch")]
pub use backend::{ElasticsearchAuth, ElasticsearchConfig, ElasticsearchEngine};
pub use query_builder::{EsQuery, EsQueryBuilder};
