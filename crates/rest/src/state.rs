//! Application state for the DBBE search API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the search engine, the object store, the page renderer
//! and the server configuration.

use std::sync::Arc;

use dbbe_search::core::{ObjectStore, SearchEngine};
use dbbe_search::entity::EntityKind;
use dbbe_search::sanitize::{FilterSanitizer, SanitizerLimits};

use crate::config::ServerConfig;
use crate::view::{ShellRenderer, ViewRenderer};

/// Shared application state for the REST API.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use dbbe_rest::{AppState, ServerConfig};
/// use dbbe_search::backends::memory::MemoryEngine;
///
/// let engine = Arc::new(MemoryEngine::new());
/// let state = AppState::new(engine.clone(), engine, ServerConfig::default());
/// assert_eq!(state.config().port, 8080);
/// ```
pub struct AppState {
    /// Runs searches and aggregations.
    engine: Arc<dyn SearchEngine>,

    /// Id-based record access.
    store: Arc<dyn ObjectStore>,

    /// Renders the HTML search pages.
    renderer: Arc<dyn ViewRenderer>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since the trait objects are wrapped in Arc
impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            store: Arc::clone(&self.store),
            renderer: Arc::clone(&self.renderer),
            config: Arc::clone(&self.config),
        }
    }
}

impl AppState {
    /// Creates a new AppState with the default page renderer.
    pub fn new(
        engine: Arc<dyn SearchEngine>,
        store: Arc<dyn ObjectStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            engine,
            store,
            renderer: Arc::new(ShellRenderer),
            config: Arc::new(config),
        }
    }

    /// Replaces the page renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn ViewRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Returns the search engine.
    pub fn engine(&self) -> &dyn SearchEngine {
        self.engine.as_ref()
    }

    /// Returns the object store.
    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Returns the page renderer.
    pub fn renderer(&self) -> &dyn ViewRenderer {
        self.renderer.as_ref()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Page size limits taken from the configuration.
    pub fn limits(&self) -> SanitizerLimits {
        SanitizerLimits {
            default_limit: self.config.default_page_size,
            max_limit: self.config.max_page_size,
        }
    }

    /// Returns a sanitizer for `entity` using the configured limits.
    pub fn sanitizer(&self, entity: EntityKind) -> FilterSanitizer {
        FilterSanitizer::new(entity.table(), self.limits())
    }

    /// Returns whether a comma-separated role list unlocks internal data.
    pub fn grants_internal(&self, roles: &str) -> bool {
        roles
            .split(',')
            .map(str::trim)
            .any(|role| role == self.config.internal_role)
    }
}
