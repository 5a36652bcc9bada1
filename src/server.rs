//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue,
    },
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{ConversionService, Converter, PageService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub conversions: Arc<ConversionService>,
    pub pages: Arc<PageService>,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    let converter = Converter::from_config(&config.codec);
    create_app_state_with_converter(asset_loader, config, converter)
}

/// Create application state around a specific converter.
pub fn create_app_state_with_converter(
    asset_loader: Arc<AssetLoader>,
    config: Arc<AppConfig>,
    converter: Converter,
) -> anyhow::Result<AppState> {
    let pages = Arc::new(
        PageService::new(&asset_loader, config.clone())
            .map_err(|e| anyhow::anyhow!("Failed to load page templates: {e}"))?,
    );
    let conversions = Arc::new(ConversionService::new(converter));

    Ok(AppState {
        config,
        conversions,
        pages,
    })
}

/// Build the router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// Every response, preflight included, carries the same static CORS
/// headers. OPTIONS requests reach the handlers.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.limits.max_upload_bytes;

    Router::new()
        // Conversion API
        .route(
            "/api/convert",
            get(api::handle_convert_status)
                .post(handle_convert)
                .options(api::handle_convert_options),
        )
        .route("/api/formats", get(api::handle_formats))
        // Pages
        .route("/", get(handle_home))
        .route("/sitemap.xml", get(handle_sitemap))
        .route("/:from/:to", get(handle_converter_page))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_convert(
    State(state): State<AppState>,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Result<Response, ApiError> {
    api::handle_convert(State(state.conversions), State(state.config), multipart).await
}

async fn handle_home(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    api::handle_home(State(state.pages), headers).await
}

async fn handle_converter_page(
    State(state): State<AppState>,
    path: Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    api::handle_converter_page(State(state.pages), path, headers).await
}

async fn handle_sitemap(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    api::handle_sitemap(State(state.pages), headers).await
}
