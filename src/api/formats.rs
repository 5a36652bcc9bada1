use axum::response::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{all_formats, SupportedFormat};
use crate::services::{envelope, quality, QualityRule};

/// One entry of the format listing
#[derive(Debug, Serialize, ToSchema)]
pub struct FormatInfo {
    /// Format label as accepted by `fromFormat` and `toFormat`
    pub format: SupportedFormat,
    /// MIME type of converted output
    pub mime: String,
    /// Whether output in this format keeps pixels exactly
    pub lossless: bool,
    /// How the 1-100 quality is applied
    pub quality: QualityRule,
    /// Human-readable form of `quality`
    pub quality_description: String,
}

impl From<SupportedFormat> for FormatInfo {
    fn from(format: SupportedFormat) -> Self {
        let rule = quality::rule_for(format);
        Self {
            format,
            mime: envelope::content_type(format),
            lossless: format.is_lossless(),
            quality: rule,
            quality_description: rule.describe(),
        }
    }
}

/// Response from the /api/formats endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List supported formats
///
/// Every listed format is accepted both as source and as target.
#[utoipa::path(
    get,
    path = "/api/formats",
    responses(
        (status = 200, description = "Supported formats", body = FormatsResponse),
    ),
    tag = "Conversion"
)]
pub async fn handle_formats() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: all_formats().iter().copied().map(FormatInfo::from).collect(),
    })
}
