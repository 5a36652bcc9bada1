//! Header parsing utilities for page requests.

use axum::http::{header::HOST, HeaderMap};

/// Extension trait for convenient header parsing.
pub trait HeaderMapExt {
    /// Get a header value as a string, returning None if missing or not ASCII.
    fn get_str(&self, name: &str) -> Option<&str>;

    /// The `Host` header, if present and non-empty.
    fn host(&self) -> Option<&str>;
}

impl HeaderMapExt for HeaderMap {
    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    fn host(&self) -> Option<&str> {
        self.get_str(HOST.as_str()).filter(|h| !h.is_empty())
    }
}
