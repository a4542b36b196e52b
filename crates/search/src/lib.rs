//! DBBE search layer.
//!
//! This crate turns untrusted search parameters into normalized,
//! engine-agnostic requests and runs them against a search backend. It is
//! shared by the HTTP server and the headless client.
//!
//! # Architecture
//!
//! - [`types`] - raw parameters, the normalized request and results
//! - [`entity`] - entity types and their filter classification tables
//! - [`sanitize`] - [`FilterSanitizer`](sanitize::FilterSanitizer)
//! - [`visibility`] - public/internal redaction of filters
//! - [`core`] - [`SearchEngine`](core::SearchEngine) and
//!   [`ObjectStore`](core::ObjectStore) traits
//! - [`backends`] - in-memory and Elasticsearch implementations
//! - [`error`] - error types
//!
//! # Quick Start
//!
//! ```
//! use dbbe_search::entity::EntityKind;
//! use dbbe_search::sanitize::FilterSanitizer;
//! use dbbe_search::types::FilterValue;
//!
//! let sanitizer = FilterSanitizer::for_entity(EntityKind::Occurrence);
//! let request = sanitizer.sanitize_query("filters[text]=βασιλεύς&filters[public]=1", false);
//!
//! // free-text searches are ranked by relevance
//! assert!(request.order_by.is_empty());
//! assert_eq!(request.filters["text_type"], FilterValue::Exact("any".into()));
//! assert_eq!(request.filters["public"], FilterValue::Flag(true));
//! ```
//!
//! # Backend Features
//!
//! - `elasticsearch` - live [`ElasticsearchEngine`](backends::elasticsearch::ElasticsearchEngine)

#![warn(missing_docs)]

pub mod backends;
pub mod core;
pub mod entity;
pub mod error;
pub mod sanitize;
pub mod types;
pub mod visibility;

pub use error::{SearchError, SearchResult};
