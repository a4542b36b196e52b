//! Object store trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::entity::EntityKind;
use crate::error::SearchResult;
use crate::types::ShortRecord;

/// Id-based access to complete records.
///
/// Used by the record pages and edit forms; search never goes through here.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the complete record.
    ///
    /// # Errors
    ///
    /// * `SearchError::NotFound` - if no record has this id
    async fn get_full(&self, entity: EntityKind, id: u64) -> SearchResult<Value>;

    /// Returns `{id, name}` pairs for every record of a type, ordered by name.
    async fn get_all_short(&self, entity: EntityKind) -> SearchResult<Vec<ShortRecord>>;

    /// Returns the records of type `related` that reference `entity`/`id`.
    ///
    /// # Errors
    ///
    /// * `SearchError::NotFound` - if `entity`/`id` does not exist
    async fn get_dependencies(
        &self,
        entity: EntityKind,
        id: u64,
        related: EntityKind,
    ) -> SearchResult<Vec<Value>>;
}
