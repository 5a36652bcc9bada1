//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;
use super::fixtures::sniff_format;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert a JSON error body with the given status and message prefix
pub fn assert_json_error(response: &TestResponse, expected: StatusCode, message_prefix: &str) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(expected.as_u16() as u64));
    let error = json["error"].as_str().unwrap_or_default();
    assert!(
        error.starts_with(message_prefix),
        "Expected error starting with {message_prefix:?}, got {error:?}"
    );
}

/// Assert a successful conversion response for `format`
pub fn assert_converted(response: &TestResponse, format: &str) {
    assert_ok(response);

    assert_eq!(
        response.header("content-type"),
        Some(format!("image/{format}").as_str()),
        "Unexpected Content-Type"
    );
    assert_eq!(
        response.header("content-disposition"),
        Some(format!("attachment; filename=\"converted-image.{format}\"").as_str()),
        "Unexpected Content-Disposition"
    );
    assert_eq!(
        response.header("content-length"),
        Some(response.body.len().to_string().as_str())
    );
    assert_eq!(
        sniff_format(&response.body),
        Some(format),
        "Body is not a {format} image ({} bytes starting with {:?})",
        response.body.len(),
        &response.body[..12.min(response.body.len())]
    );
}

/// Assert the CORS headers every response carries
pub fn assert_cors(response: &TestResponse) {
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));

    let methods = response
        .header("access-control-allow-methods")
        .unwrap_or_default()
        .to_ascii_uppercase();
    for method in ["GET", "POST", "OPTIONS"] {
        assert!(methods.contains(method), "missing {method} in {methods:?}");
    }

    let headers = response
        .header("access-control-allow-headers")
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(headers.contains("content-type"), "got {headers:?}");
}
