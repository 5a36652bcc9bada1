//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use imgconv::assets::AssetLoader;
use imgconv::models::AppConfig;
use imgconv::server::{build_router, create_app_state, create_app_state_with_converter, AppState};
use imgconv::services::Converter;

const BOUNDARY: &str = "----imgconv-test-boundary";

/// One field of a multipart form
pub enum FormPart {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        FormPart::Text {
            name,
            value: value.into(),
        }
    }

    pub fn file(bytes: Vec<u8>, format: &str) -> Self {
        FormPart::File {
            name: "file",
            filename: format!("upload.{format}"),
            content_type: format!("image/{format}"),
            bytes,
        }
    }
}

/// The standard upload form: file, fromFormat, toFormat and an optional quality
pub fn convert_form(file: Vec<u8>, from: &str, to: &str, quality: Option<&str>) -> Vec<FormPart> {
    let mut parts = vec![
        FormPart::file(file, from),
        FormPart::text("fromFormat", from),
        FormPart::text("toFormat", to),
    ];
    if let Some(q) = quality {
        parts.push(FormPart::text("quality", q));
    }
    parts
}

/// Encode parts as a `multipart/form-data` body
pub fn multipart_body(parts: &[FormPart]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Test application with router and direct access to state
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application using embedded assets
    pub fn new() -> Self {
        Self::from_state(Self::create_state())
    }

    /// Test application whose conversions go through `converter`
    pub fn with_converter(converter: Converter) -> Self {
        Self::with_config_and_converter(AppConfig::default(), converter)
    }

    /// Test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let converter = Converter::from_config(&config.codec);
        Self::with_config_and_converter(config, converter)
    }

    fn with_config_and_converter(config: AppConfig, converter: Converter) -> Self {
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        let state = create_app_state_with_converter(asset_loader, Arc::new(config), converter)
            .expect("Failed to create app state");
        Self::from_state(state)
    }

    fn from_state(state: AppState) -> Self {
        // Build router using shared server module (same as production)
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Create app state from embedded assets
    pub fn create_state() -> AppState {
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        create_app_state(asset_loader).expect("Failed to create app state")
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Make an OPTIONS request with custom headers
    pub async fn options(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::options(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// POST a multipart form
    pub async fn post_multipart(&self, path: &str, parts: &[FormPart]) -> TestResponse {
        let request = Request::post(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.request(request).await
    }

    /// POST the standard conversion form to /api/convert
    pub async fn convert(
        &self,
        file: Vec<u8>,
        from: &str,
        to: &str,
        quality: Option<&str>,
    ) -> TestResponse {
        self.post_multipart("/api/convert", &convert_form(file, from, to, quality))
            .await
    }

    /// Make a POST request with a raw body and content type
    pub async fn post_raw(&self, path: &str, content_type: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
