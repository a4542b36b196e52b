//! Error types for the search layer.
//!
//! Sanitization never fails; these errors come from the object store and
//! the search engine backends.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::entity::EntityKind;

/// Errors returned by [`SearchEngine`](crate::core::SearchEngine) and
/// [`ObjectStore`](crate::core::ObjectStore) implementations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The requested record does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: EntityKind, id: u64 },

    /// The entity path or relation name is unknown.
    #[error("unknown entity type: {name}")]
    UnknownEntity { name: String },

    /// The backend failed to answer.
    #[error("search backend error ({backend_name}): {message}")]
    Backend {
        backend_name: String,
        message: String,
    },

    /// A stored or returned document had an unexpected shape.
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },
}

impl SearchError {
    /// Convenience constructor for [`SearchError::NotFound`].
    pub fn not_found(entity: EntityKind, id: u64) -> Self {
        SearchError::NotFound { entity, id }
    }

    /// Convenience constructor for [`SearchError::Backend`].
    pub fn backend(backend_name: impl Into<String>, message: impl Into<String>) -> Self {
        SearchError::Backend {
            backend_name: backend_name.into(),
            message: message.into(),
        }
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::NotFound { .. })
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::InvalidDocument {
            message: err.to_string(),
        }
    }
}

/// Result alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
