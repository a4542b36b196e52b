//! Core types shared by the sanitizer, the engines and the client.
//!
//! - [`RawParams`] / [`ParamValue`] - untrusted bracketed request parameters
//! - [`SearchRequest`], [`FilterValue`], [`Filters`] - the normalized request
//! - [`SearchPage`], [`SearchResponse`], [`AggregationResult`] - results
//!
//! # Example
//!
//! ```
//! use dbbe_search::types::{FilterValue, RawParams, SearchRequest};
//!
//! let params = RawParams::parse_query("page=2&filters[city]=3");
//! assert_eq!(params.get_str("page"), Some("2"));
//!
//! let mut request = SearchRequest::default();
//! request.filters.insert("city".into(), FilterValue::Nested(vec![3]));
//! assert_eq!(request.to_params().to_query_string(), "filters%5Bcity%5D%5B%5D=3&limit=25&page=1");
//! ```

mod params;
mod request;
mod results;

pub use params::{ParamValue, RawParams};
pub use request::{
    DEFAULT_LIMIT, DEFAULT_PAGE, DateSearchType, FilterValue, Filters, NestedOperator,
    SearchRequest, TextMatchMode, YearRange,
};
pub use results::{AggregationBucket, AggregationResult, SearchPage, SearchResponse, ShortRecord};
