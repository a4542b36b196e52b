//! Search parameters extractor.
//!
//! The query string of the search endpoints uses PHP-style brackets
//! (`filters[city]=3`, `filters[content][]=1`), which the plain `Query`
//! extractor cannot represent. The raw query is handed to
//! [`RawParams::parse_query`] instead.

use std::ops::Deref;

use axum::{extract::FromRequestParts, http::request::Parts};
use dbbe_search::types::RawParams;

/// Axum extractor for the raw search parameters.
///
/// Never rejects: malformed pieces are dropped later by the sanitizer.
///
/// # Example
///
/// ```rust,ignore
/// use dbbe_rest::extractors::SearchParams;
///
/// async fn search_handler(params: SearchParams) {
///     if let Some(order) = params.get_str("orderBy") {
///         println!("ordered by {}", order);
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchParams(pub RawParams);

impl SearchParams {
    /// Parses a raw query string.
    pub fn from_query(query: &str) -> Self {
        Self(RawParams::parse_query(query))
    }

    /// Consumes the extractor and returns the parameters.
    pub fn into_inner(self) -> RawParams {
        self.0
    }
}

impl Deref for SearchParams {
    type Target = RawParams;

    fn deref(&self) -> &RawParams {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SearchParams::from_query(parts.uri.query().unwrap_or_default()))
    }
}
