use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
};
use std::sync::Arc;

use super::headers::HeaderMapExt;
use crate::error::ApiError;
use crate::models::SupportedFormat;
use crate::services::PageService;

/// Home page with links to every conversion pair
pub async fn handle_home(
    State(pages): State<Arc<PageService>>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let base_url = pages.base_url(headers.host());
    Ok(Html(pages.render_home(&base_url)?))
}

/// Converter page for `/{from}/{to}`
///
/// Both path segments must be supported formats; anything else is a 404.
pub async fn handle_converter_page(
    State(pages): State<Arc<PageService>>,
    Path((from, to)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let (Some(from), Some(to)) = (
        SupportedFormat::from_label(&from),
        SupportedFormat::from_label(&to),
    ) else {
        tracing::debug!(%from, %to, "Unknown conversion page");
        return Err(ApiError::NotFound);
    };

    let base_url = pages.base_url(headers.host());
    Ok(Html(pages.render_converter(from, to, &base_url)?))
}

/// Sitemap listing the home page and all converter pages
pub async fn handle_sitemap(
    State(pages): State<Arc<PageService>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let base_url = pages.base_url(headers.host());
    let today = chrono::Utc::now().date_naive();
    let xml = pages.render_sitemap(&base_url, today)?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}
