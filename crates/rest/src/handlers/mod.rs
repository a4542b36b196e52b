//! HTTP request handlers for the search API.
//!
//! - [`search`] - Search page and JSON search endpoint
//! - [`read`] - Short listings, full records and dependencies
//! - [`health`] - Health check endpoint

pub mod health;
pub mod read;
pub mod search;

use dbbe_search::entity::EntityKind;

use crate::error::{RestError, RestResult};

// Re-export handlers for convenience
pub use health::health_handler;
pub use read::{dependencies_handler, read_handler, short_list_handler};
pub use search::{search_api_handler, search_page_handler};

/// Maps a path segment such as `manuscripts` to its entity type.
pub(crate) fn resolve_entity(segment: &str) -> RestResult<EntityKind> {
    EntityKind::from_path(segment).ok_or_else(|| RestError::UnknownEntity {
        name: segment.to_string(),
    })
}
