//! Registry of supported image formats.
//!
//! `SupportedFormat::ALL` is the only list of formats in the crate. Request
//! validation, page routing, the home page listing and the sitemap all read
//! from it.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::ConversionError;

/// A raster format the converter can produce and accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SupportedFormat {
    Jpeg,
    Png,
    Webp,
    Tiff,
    Gif,
    Avif,
}

impl SupportedFormat {
    /// All supported formats, in listing order
    pub const ALL: [SupportedFormat; 6] = [
        SupportedFormat::Jpeg,
        SupportedFormat::Png,
        SupportedFormat::Webp,
        SupportedFormat::Tiff,
        SupportedFormat::Gif,
        SupportedFormat::Avif,
    ];

    /// Canonical lowercase label, also used as file extension and MIME subtype
    pub fn label(self) -> &'static str {
        match self {
            SupportedFormat::Jpeg => "jpeg",
            SupportedFormat::Png => "png",
            SupportedFormat::Webp => "webp",
            SupportedFormat::Tiff => "tiff",
            SupportedFormat::Gif => "gif",
            SupportedFormat::Avif => "avif",
        }
    }

    /// Whether re-encoding to this format preserves pixels exactly
    pub fn is_lossless(self) -> bool {
        matches!(self, SupportedFormat::Png | SupportedFormat::Gif)
    }

    /// Look up a label in the registry.
    ///
    /// Matching ignores ASCII case. Aliases such as `jpg` or `tif` are not
    /// accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SupportedFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ConversionError::UnsupportedFormat(s.to_string()))
    }
}

/// Check whether a label names a supported format
pub fn is_supported(label: &str) -> bool {
    SupportedFormat::from_label(label).is_some()
}

/// All supported formats, in listing order
pub fn all_formats() -> &'static [SupportedFormat] {
    &SupportedFormat::ALL
}

/// Conversion pairs offered for navigation.
///
/// Identity pairs are left out of the listing only; the converter itself
/// accepts them.
pub fn listing_pairs() -> impl Iterator<Item = (SupportedFormat, SupportedFormat)> {
    SupportedFormat::ALL.into_iter().flat_map(|from| {
        SupportedFormat::ALL
            .into_iter()
            .filter(move |&to| to != from)
            .map(move |to| (from, to))
    })
}
