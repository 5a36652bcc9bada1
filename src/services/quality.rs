//! Quality normalization.
//!
//! Each codec exposes a different native quality axis. The per-format rule
//! lives in [`rule_for`]; the match is exhaustive, so a new format does not
//! compile until it has a rule.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{EncodeParameters, SupportedFormat};

/// How the generic 1-100 quality maps onto a codec's native parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityRule {
    /// Native quality equals the generic quality
    Identity,
    /// `round(quality / 100 * max)`, halves rounded up
    Scaled { max: u8 },
    /// The codec has no quality axis
    Ignored,
}

impl QualityRule {
    /// Apply the rule to a quality value (0-100)
    pub fn apply(self, quality: u8) -> EncodeParameters {
        match self {
            QualityRule::Identity => EncodeParameters::Quality(quality),
            QualityRule::Scaled { max } => {
                let scaled = (quality as u32 * max as u32 + 50) / 100;
                EncodeParameters::CompressionLevel(scaled as u8)
            }
            QualityRule::Ignored => EncodeParameters::CodecDefaults,
        }
    }

    /// Short description for format listings
    pub fn describe(self) -> String {
        match self {
            QualityRule::Identity => "quality 1-100".to_string(),
            QualityRule::Scaled { max } => format!("compression level 0-{max}"),
            QualityRule::Ignored => "none".to_string(),
        }
    }
}

/// Rule for a format
pub fn rule_for(format: SupportedFormat) -> QualityRule {
    match format {
        SupportedFormat::Jpeg
        | SupportedFormat::Webp
        | SupportedFormat::Tiff
        | SupportedFormat::Avif => QualityRule::Identity,
        SupportedFormat::Png => QualityRule::Scaled { max: 9 },
        SupportedFormat::Gif => QualityRule::Ignored,
    }
}

/// Derive encoder parameters for `target`.
///
/// `quality` must already be validated; this function never clamps.
pub fn normalize(target: SupportedFormat, quality: u8) -> EncodeParameters {
    debug_assert!(quality <= 100, "quality must be validated before normalizing");
    rule_for(target).apply(quality)
}
