//! HTTP response assertions.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts that the response has the expected status code.
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status_code().as_u16();
    assert_eq!(
        actual, expected,
        "Expected status {}, got {}",
        expected, actual
    );
}

/// Asserts the `{"error": {"code", "message"}}` envelope.
pub fn assert_error(response: &TestResponse, status: u16, code: &str) {
    assert_status(response, status);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], code, "unexpected body {body}");
    assert!(body["error"]["message"].is_string());
}

/// Returns the ids of the records in a search response.
pub fn result_ids(body: &Value) -> Vec<u64> {
    body["data"]
        .as_array()
        .map(|data| data.iter().filter_map(|doc| doc["id"].as_u64()).collect())
        .unwrap_or_default()
}

/// Returns the bucket ids of one facet field.
pub fn bucket_ids(body: &Value, field: &str) -> Vec<u64> {
    body["aggregation"][field]
        .as_array()
        .map(|buckets| buckets.iter().filter_map(|b| b["id"].as_u64()).collect())
        .unwrap_or_default()
}
