//! HTTP transport for the search API.

use async_trait::async_trait;
use dbbe_search::entity::EntityKind;
use dbbe_search::types::SearchResponse;
use reqwest::Client;
use reqwest::header::ACCEPT;

use crate::config::ClientConfig;
use crate::dispatch::SearchTransport;
use crate::error::{TransportError, TransportResult};
use crate::model::SearchQuery;

/// Calls `GET {base}/{entity}/search_api` with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport for one entity's search API.
    pub fn new(config: &ClientConfig, entity: EntityKind) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("dbbe-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, &config.base_url, entity))
    }

    /// Uses an existing client.
    pub fn with_client(client: Client, base_url: &str, entity: EntityKind) -> Self {
        let endpoint = format!(
            "{}/{}/search_api",
            base_url.trim_end_matches('/'),
            entity.path()
        );
        Self { client, endpoint }
    }

    /// URL requested for `query`.
    pub fn url(&self, query: &SearchQuery) -> String {
        format!("{}?{}", self.endpoint, query.to_query_string())
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn search(&self, query: &SearchQuery) -> TransportResult<SearchResponse> {
        let url = self.url(query);
        tracing::debug!(url = %url, "GET search_api");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                }),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Extracts `error.message` from an error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_url() {
        let transport = HttpTransport::with_client(
            Client::new(),
            "http://localhost:8080/",
            EntityKind::Occurrence,
        );
        let query = SearchQuery {
            limit: 10,
            page: 2,
            order_by: None,
            ascending: true,
            filters: BTreeMap::new(),
        };
        assert_eq!(
            transport.url(&query),
            "http://localhost:8080/occurrences/search_api?limit=10&page=2"
        );
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":"invalid","message":"Only JSON requests allowed"}}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("Only JSON requests allowed")
        );
        assert_eq!(error_message("<html>"), None);
    }
}
