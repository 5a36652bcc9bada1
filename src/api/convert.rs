use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{AppConfig, ConversionRequest};
use crate::services::ConversionService;

/// Error body returned by the conversion endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Error message
    pub error: String,
}

/// Liveness body for `GET /api/convert`
#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertStatusResponse {
    /// Always "ok"
    pub status: String,
}

/// Multipart fields accepted by `POST /api/convert`
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertUpload {
    /// Image file to convert
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Declared source format (jpeg, png, webp, tiff, gif, avif)
    pub from_format: String,
    /// Requested target format
    pub to_format: String,
    /// Quality from 1 to 100, default 80
    pub quality: Option<String>,
}

/// Form fields as received, before validation
#[derive(Debug, Default)]
struct ConvertForm {
    file: Option<Vec<u8>>,
    from_format: Option<String>,
    to_format: Option<String>,
    quality: Option<String>,
}

impl ConvertForm {
    async fn read(mut multipart: Multipart, limit: usize) -> Result<Self, ApiError> {
        let mut form = Self::default();
        let bad_form = |e: MultipartError| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::TooLarge(limit)
            } else {
                ApiError::BadForm(e.body_text())
            }
        };

        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => form.file = Some(field.bytes().await.map_err(bad_form)?.to_vec()),
                "fromFormat" => form.from_format = Some(field.text().await.map_err(bad_form)?),
                "toFormat" => form.to_format = Some(field.text().await.map_err(bad_form)?),
                "quality" => form.quality = Some(field.text().await.map_err(bad_form)?),
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    fn into_request(self) -> Result<ConversionRequest, ApiError> {
        Ok(ConversionRequest::from_form(
            self.file.unwrap_or_default(),
            self.from_format.as_deref(),
            self.to_format.as_deref(),
            self.quality.as_deref(),
        )?)
    }
}

/// Convert an uploaded image
///
/// Returns the converted image as an attachment named `converted-image.{toFormat}`.
/// The declared `fromFormat` must be a supported format but does not have to
/// match the file; the real encoding is detected from its bytes.
#[utoipa::path(
    post,
    path = "/api/convert",
    request_body(content = ConvertUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Converted image with Content-Type image/{toFormat}"),
        (status = 400, description = "Missing field, unsupported format or invalid quality", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse),
    ),
    tag = "Conversion"
)]
pub async fn handle_convert(
    State(conversions): State<Arc<ConversionService>>,
    State(config): State<Arc<AppConfig>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::BadForm(e.body_text()))?;
    let form = ConvertForm::read(multipart, config.limits.max_upload_bytes).await?;

    let request = form.into_request().inspect_err(|e| {
        tracing::info!(error = %e, "Rejected conversion request");
    })?;

    tracing::debug!(
        source = %request.source(),
        target = %request.target(),
        quality = request.quality().get(),
        bytes = request.payload().len(),
        "Conversion request received"
    );

    let result = conversions.convert(request).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, result.content_type.clone()),
            (header::CONTENT_DISPOSITION, result.content_disposition()),
            (header::CONTENT_LENGTH, result.bytes.len().to_string()),
        ],
        result.bytes,
    )
        .into_response())
}

/// Conversion endpoint liveness check
#[utoipa::path(
    get,
    path = "/api/convert",
    responses(
        (status = 200, description = "Endpoint is up", body = ConvertStatusResponse),
    ),
    tag = "Conversion"
)]
pub async fn handle_convert_status() -> Json<ConvertStatusResponse> {
    Json(ConvertStatusResponse {
        status: "ok".to_string(),
    })
}

/// Empty JSON body for `OPTIONS /api/convert`; CORS headers come from the router
pub async fn handle_convert_options() -> impl IntoResponse {
    Json(json!({}))
}
