//! JSON-only guard for the API endpoints.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::RestError;

/// Rejects requests whose `Accept` header does not allow JSON.
///
/// A missing header is rejected as well: the API endpoints are only called
/// by the search page's script, which always asks for JSON.
#[derive(Debug, Clone, Copy)]
pub struct JsonOnly;

/// Returns whether an `Accept` header value admits `application/json`.
pub fn accepts_json(accept: &str) -> bool {
    accept.split(',').any(|item| {
        let Ok(mime) = item.trim().parse::<mime::Mime>() else {
            return false;
        };
        match (mime.type_(), mime.subtype()) {
            (mime::APPLICATION, mime::JSON) => true,
            (mime::APPLICATION, sub) => sub.as_str().ends_with("+json"),
            _ => false,
        }
    })
}

impl<S> FromRequestParts<S> for JsonOnly
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if accepts_json(accept) {
            Ok(JsonOnly)
        } else {
            Err(RestError::BadRequest {
                message: "Only JSON requests allowed".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_json() {
        assert!(accepts_json("application/json"));
        assert!(accepts_json("text/html, application/json;q=0.9"));
        assert!(accepts_json("application/vnd.api+json"));
        assert!(!accepts_json("text/html"));
        assert!(!accepts_json("*/*"));
        assert!(!accepts_json(""));
    }
}
