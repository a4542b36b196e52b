//! Client configuration.

use std::time::Duration;

/// Timing and bounds used by a search session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the search API, e.g. `https://www.dbbe.ugent.be`.
    pub base_url: String,

    /// Delay between the last keystroke in a free-text field and the search.
    pub text_debounce: Duration,

    /// Delay for every other kind of field.
    pub field_debounce: Duration,

    /// Per-request timeout of the HTTP transport.
    pub request_timeout: Duration,

    /// Page size sent with every query.
    pub page_size: usize,

    /// Smallest accepted year.
    pub year_min: i32,

    /// Largest accepted year.
    pub year_max: i32,

    /// Whether the session drives a search page; see
    /// [`FacetFieldController::new`](crate::facets::FacetFieldController::new).
    pub search_page: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            text_debounce: Duration::from_millis(1000),
            field_debounce: Duration::ZERO,
            request_timeout: Duration::from_secs(30),
            page_size: 25,
            year_min: 0,
            year_max: 9999,
            search_page: true,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for a server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}
