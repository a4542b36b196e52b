//! Search engine trait.

use async_trait::async_trait;

use crate::entity::EntityKind;
use crate::error::SearchResult;
use crate::types::{AggregationResult, Filters, SearchPage, SearchRequest, SearchResponse};
use crate::visibility::{redact_record, visible_facets};

/// A backend able to run sanitized search requests.
///
/// The [`SearchRequest`] produced by
/// [`FilterSanitizer`](crate::sanitize::FilterSanitizer) is passed as-is;
/// engines never see raw parameters.
///
/// # Example
///
/// ```ignore
/// use dbbe_search::core::SearchEngine;
/// use dbbe_search::entity::EntityKind;
/// use dbbe_search::sanitize::FilterSanitizer;
///
/// async fn search<E: SearchEngine>(engine: &E) -> Result<(), SearchError> {
///     let request = FilterSanitizer::for_entity(EntityKind::Manuscript)
///         .sanitize_query("filters[city]=3", false);
///     let response = engine
///         .search_with_aggregation(EntityKind::Manuscript, &request, false)
///         .await?;
///     println!("{} manuscripts", response.count);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Returns one page of records matching the request.
    ///
    /// # Errors
    ///
    /// * `SearchError::Backend` - if the backend cannot answer
    async fn search(&self, entity: EntityKind, request: &SearchRequest)
    -> SearchResult<SearchPage>;

    /// Computes facet buckets for `fields` under `filters`.
    ///
    /// The buckets of a field are computed without that field's own filter,
    /// so a user can widen a selection as well as narrow it. Every requested
    /// field is present in the result, possibly with no buckets.
    async fn aggregate(
        &self,
        entity: EntityKind,
        fields: &[&str],
        filters: &Filters,
    ) -> SearchResult<AggregationResult>;

    /// Runs a search and the entity's standard aggregation together.
    ///
    /// Without internal access the internal-only facets are skipped and every
    /// hit is passed through [`redact_record`].
    async fn search_with_aggregation(
        &self,
        entity: EntityKind,
        request: &SearchRequest,
        caller_can_view_internal: bool,
    ) -> SearchResult<SearchResponse> {
        let mut page = self.search(entity, request).await?;
        let fields = visible_facets(entity.table().aggregate_fields, caller_can_view_internal);
        let aggregation = self.aggregate(entity, &fields, &request.filters).await?;
        if !caller_can_view_internal {
            page.data.iter_mut().for_each(redact_record);
        }
        Ok(SearchResponse::new(page, aggregation))
    }
}
