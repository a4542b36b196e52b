//! [`SearchEngine`] implementation for the Elasticsearch backend.

use async_trait::async_trait;
use elasticsearch::SearchParts;
use serde_json::Value;
use tracing::debug;

use crate::core::SearchEngine;
use crate::entity::EntityKind;
use crate::error::{SearchError, SearchResult};
use crate::types::{AggregationResult, Filters, SearchPage, SearchRequest};

use super::backend::{BACKEND_NAME, ElasticsearchEngine};
use super::query_builder::{
    EsQuery, EsQueryBuilder, parse_aggregation_response, parse_search_response,
};

impl ElasticsearchEngine {
    async fn execute(&self, query: EsQuery) -> SearchResult<Option<Value>> {
        let response = self
            .client()
            .search(SearchParts::Index(&[&query.index]))
            .body(query.body)
            .send()
            .await
            .map_err(|e| SearchError::backend(BACKEND_NAME, e.to_string()))?;

        if !response.status_code().is_success() {
            let body = response.text().await.unwrap_or_default();
            // a missing index simply has no documents yet
            if body.contains("index_not_found_exception") {
                debug!(index = %query.index, "Index not found, returning no results");
                return Ok(None);
            }
            return Err(SearchError::backend(
                BACKEND_NAME,
                format!("Search failed: {}", body),
            ));
        }

        let body = response.json::<Value>().await.map_err(|e| {
            SearchError::backend(BACKEND_NAME, format!("Failed to parse response: {}", e))
        })?;
        Ok(Some(body))
    }
}

#[async_trait]
impl SearchEngine for ElasticsearchEngine {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn search(
        &self,
        entity: EntityKind,
        request: &SearchRequest,
    ) -> SearchResult<SearchPage> {
        let builder = EsQueryBuilder::new(entity.table(), self.index_name(entity));
        let query = builder.build(request);
        debug!(entity = %entity, body = %query.body, "Elasticsearch search");

        Ok(self
            .execute(query)
            .await?
            .map(|body| parse_search_response(&body))
            .unwrap_or_default())
    }

    async fn aggregate(
        &self,
        entity: EntityKind,
        fields: &[&str],
        filters: &Filters,
    ) -> SearchResult<AggregationResult> {
        let builder = EsQueryBuilder::new(entity.table(), self.index_name(entity));
        let query = builder.build_aggregation(fields, filters);

        let body = self.execute(query).await?.unwrap_or(Value::Null);
        Ok(parse_aggregation_response(&body, fields))
    }
}
