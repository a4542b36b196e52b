//! Axum extractors for the search API.
//!
//! - [`SearchParams`] - Parse the bracket-notation query string
//! - [`CallerRole`] - Decide whether the caller may see internal data
//! - [`JsonOnly`] - Require a JSON `Accept` header

mod accept;
mod caller;
mod search_params;

pub use accept::JsonOnly;
pub use caller::CallerRole;
pub use search_params::SearchParams;
