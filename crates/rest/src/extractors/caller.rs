//! Caller privilege extractor.
//!
//! Authentication happens in front of this service; the proxy forwards the
//! caller's roles in a header (see [`ServerConfig::role_header`]).
//!
//! [`ServerConfig::role_header`]: crate::ServerConfig::role_header

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::state::AppState;

/// Whether the caller may see internal records and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallerRole {
    can_view_internal: bool,
}

impl CallerRole {
    /// A public visitor.
    pub fn public() -> Self {
        Self::default()
    }

    /// An editor allowed to see internal data.
    pub fn internal() -> Self {
        Self {
            can_view_internal: true,
        }
    }

    /// Returns whether internal data is visible.
    pub fn can_view_internal(&self) -> bool {
        self.can_view_internal
    }
}

impl FromRequestParts<AppState> for CallerRole {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let roles = parts
            .headers
            .get(state.config().role_header.as_str())
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        Ok(CallerRole {
            can_view_internal: state.grants_internal(roles),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::Request;
    use dbbe_search::backends::memory::MemoryEngine;

    use crate::config::ServerConfig;

    async fn extract(request: Request<()>) -> CallerRole {
        let engine = Arc::new(MemoryEngine::new());
        let state = AppState::new(engine.clone(), engine, ServerConfig::for_testing());
        let (mut parts, _) = request.into_parts();
        CallerRole::from_request_parts(&mut parts, &state).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_public() {
        let role = extract(Request::builder().uri("/").body(()).unwrap()).await;
        assert_eq!(role, CallerRole::public());
    }

    #[tokio::test]
    async fn test_internal_role() {
        let request = Request::builder()
            .uri("/")
            .header("X-Dbbe-Roles", "ROLE_EDITOR,ROLE_VIEW_INTERNAL")
            .body(())
            .unwrap();
        assert!(extract(request).await.can_view_internal());
    }
}
