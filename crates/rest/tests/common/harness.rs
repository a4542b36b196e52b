//! API test harness.

use axum::http::{HeaderName, HeaderValue, header};
use axum_test::{TestResponse, TestServer};
use dbbe_rest::{ServerConfig, create_app_with_config};
use dbbe_search::backends::memory::MemoryEngine;

use super::fixtures::sample_documents;

const ROLES: HeaderName = HeaderName::from_static("x-dbbe-roles");

/// Test server backed by a memory engine seeded with the sample records.
pub struct TestHarness {
    /// The test server instance.
    pub server: TestServer,
}

impl TestHarness {
    /// Creates a harness with [`ServerConfig::for_testing`].
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let engine = MemoryEngine::new();
        engine
            .load_json(&sample_documents())
            .expect("Failed to load fixtures");
        let app = create_app_with_config(engine, config);
        let server = TestServer::new(app).expect("Failed to create test server");
        Self { server }
    }

    /// JSON request from a public visitor.
    pub async fn get_json(&self, path: &str) -> TestResponse {
        self.server
            .get(path)
            .add_header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .await
    }

    /// JSON request from an editor with internal access.
    pub async fn get_json_internal(&self, path: &str) -> TestResponse {
        self.server
            .get(path)
            .add_header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .add_header(ROLES, HeaderValue::from_static("ROLE_EDITOR,ROLE_VIEW_INTERNAL"))
            .await
    }

    /// Browser request for an HTML page.
    pub async fn get_html(&self, path: &str) -> TestResponse {
        self.server
            .get(path)
            .add_header(header::ACCEPT, HeaderValue::from_static("text/html"))
            .await
    }
}
