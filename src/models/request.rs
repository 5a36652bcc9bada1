use crate::error::ConversionError;
use crate::models::SupportedFormat;

/// Quality applied when the caller does not send one
pub const DEFAULT_QUALITY: u8 = 80;

/// Generic 1-100 quality value, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Validate an integer quality. Out-of-range values are rejected, not clamped.
    pub fn new(value: i64) -> Result<Self, ConversionError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ConversionError::InvalidQuality(value.to_string()))
        }
    }

    /// Parse a quality from form or CLI text
    pub fn parse(text: &str) -> Result<Self, ConversionError> {
        let value: i64 = text
            .trim()
            .parse()
            .map_err(|_| ConversionError::InvalidQuality(text.to_string()))?;
        Self::new(value)
    }

    /// Resolve an optional quality, falling back to [`DEFAULT_QUALITY`]
    pub fn or_default(value: Option<i64>) -> Result<Self, ConversionError> {
        value.map_or(Ok(Self::default()), Self::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

/// A single validated conversion call
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    payload: Vec<u8>,
    source: SupportedFormat,
    target: SupportedFormat,
    quality: Quality,
}

impl ConversionRequest {
    /// Build a request from already-typed parts.
    ///
    /// An empty payload counts as missing input.
    pub fn new(
        payload: Vec<u8>,
        source: SupportedFormat,
        target: SupportedFormat,
        quality: Quality,
    ) -> Result<Self, ConversionError> {
        if payload.is_empty() {
            return Err(ConversionError::MissingInput("file"));
        }
        Ok(Self {
            payload,
            source,
            target,
            quality,
        })
    }

    /// Validate raw caller input.
    ///
    /// Checks run in a fixed order: missing input, quality, source label,
    /// target label. The first failure is returned.
    pub fn from_labels(
        payload: Vec<u8>,
        source: Option<&str>,
        target: Option<&str>,
        quality: Option<i64>,
    ) -> Result<Self, ConversionError> {
        Self::validate(payload, source, target, || Quality::or_default(quality))
    }

    /// Validate multipart form fields, where quality arrives as text.
    ///
    /// A blank quality field counts as absent.
    pub fn from_form(
        payload: Vec<u8>,
        source: Option<&str>,
        target: Option<&str>,
        quality: Option<&str>,
    ) -> Result<Self, ConversionError> {
        Self::validate(payload, source, target, || {
            quality
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map_or(Ok(Quality::default()), Quality::parse)
        })
    }

    fn validate(
        payload: Vec<u8>,
        source: Option<&str>,
        target: Option<&str>,
        quality: impl FnOnce() -> Result<Quality, ConversionError>,
    ) -> Result<Self, ConversionError> {
        if payload.is_empty() {
            return Err(ConversionError::MissingInput("file"));
        }
        let source = source
            .filter(|s| !s.is_empty())
            .ok_or(ConversionError::MissingInput("fromFormat"))?;
        let target = target
            .filter(|s| !s.is_empty())
            .ok_or(ConversionError::MissingInput("toFormat"))?;

        let quality = quality()?;
        let source: SupportedFormat = source.parse()?;
        let target: SupportedFormat = target.parse()?;

        Self::new(payload, source, target, quality)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn source(&self) -> SupportedFormat {
        self.source
    }

    pub fn target(&self) -> SupportedFormat {
        self.target
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }
}

/// Native encoder parameter derived from a [`Quality`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeParameters {
    /// Lossy quality, 1-100
    Quality(u8),
    /// Lossless compression effort, 0-9
    CompressionLevel(u8),
    /// The codec has no tunable axis
    CodecDefaults,
}

/// Converted image with the metadata a caller needs to serve it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

impl ConversionResult {
    /// `Content-Disposition` value offering the result as a download
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_bounds() {
        assert_eq!(Quality::new(1).unwrap().get(), 1);
        assert_eq!(Quality::new(100).unwrap().get(), 100);
        for bad in [0, 101, -5, i64::MAX, i64::MIN] {
            assert_eq!(
                Quality::new(bad),
                Err(ConversionError::InvalidQuality(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!(Quality::parse("75").unwrap().get(), 75);
        assert_eq!(Quality::parse(" 42 ").unwrap().get(), 42);
        assert_eq!(
            Quality::parse("high"),
            Err(ConversionError::InvalidQuality("high".to_string()))
        );
        assert_eq!(
            Quality::parse("50.5"),
            Err(ConversionError::InvalidQuality("50.5".to_string()))
        );
        assert!(Quality::parse("0").is_err());
    }

    #[test]
    fn test_quality_default() {
        assert_eq!(Quality::default().get(), DEFAULT_QUALITY);
        assert_eq!(Quality::or_default(None).unwrap().get(), 80);
        assert_eq!(Quality::or_default(Some(10)).unwrap().get(), 10);
    }

    #[test]
    fn test_from_labels_ok() {
        let request =
            ConversionRequest::from_labels(vec![1, 2, 3], Some("png"), Some("JPEG"), None)
                .unwrap();
        assert_eq!(request.source(), SupportedFormat::Png);
        assert_eq!(request.target(), SupportedFormat::Jpeg);
        assert_eq!(request.quality().get(), 80);
        assert_eq!(request.payload(), &[1, 2, 3]);
    }

    #[test]
    fn test_from_labels_same_format_allowed() {
        let request =
            ConversionRequest::from_labels(vec![1], Some("gif"), Some("gif"), Some(5)).unwrap();
        assert_eq!(request.source(), request.target());
    }

    #[test]
    fn test_from_labels_empty_payload() {
        let err = ConversionRequest::from_labels(Vec::new(), Some("jpeg"), Some("png"), Some(80))
            .unwrap_err();
        assert_eq!(err, ConversionError::MissingInput("file"));
    }

    #[test]
    fn test_from_labels_missing_formats() {
        let err = ConversionRequest::from_labels(vec![1], None, Some("png"), None).unwrap_err();
        assert_eq!(err, ConversionError::MissingInput("fromFormat"));

        let err = ConversionRequest::from_labels(vec![1], Some("png"), Some(""), None).unwrap_err();
        assert_eq!(err, ConversionError::MissingInput("toFormat"));
    }

    #[test]
    fn test_from_labels_unsupported() {
        let err =
            ConversionRequest::from_labels(vec![1], Some("bmp"), Some("png"), None).unwrap_err();
        assert_eq!(err, ConversionError::UnsupportedFormat("bmp".to_string()));

        let err =
            ConversionRequest::from_labels(vec![1], Some("png"), Some("svg"), None).unwrap_err();
        assert_eq!(err, ConversionError::UnsupportedFormat("svg".to_string()));
    }

    #[test]
    fn test_from_labels_quality_checked_before_formats() {
        let err = ConversionRequest::from_labels(vec![1], Some("bmp"), Some("svg"), Some(0))
            .unwrap_err();
        assert_eq!(err, ConversionError::InvalidQuality("0".to_string()));
    }

    #[test]
    fn test_from_form_quality_text() {
        let request =
            ConversionRequest::from_form(vec![1], Some("png"), Some("webp"), Some("35")).unwrap();
        assert_eq!(request.quality().get(), 35);

        let request =
            ConversionRequest::from_form(vec![1], Some("png"), Some("webp"), Some("")).unwrap();
        assert_eq!(request.quality().get(), 80);

        let err = ConversionRequest::from_form(vec![1], Some("bmp"), Some("webp"), Some("max"))
            .unwrap_err();
        assert_eq!(err, ConversionError::InvalidQuality("max".to_string()));

        // Missing input still wins over a bad quality
        let err = ConversionRequest::from_form(vec![1], None, Some("webp"), Some("max"))
            .unwrap_err();
        assert_eq!(err, ConversionError::MissingInput("fromFormat"));
    }

    #[test]
    fn test_content_disposition() {
        let result = ConversionResult {
            bytes: vec![],
            content_type: "image/png".to_string(),
            filename: "converted-image.png".to_string(),
        };
        assert_eq!(
            result.content_disposition(),
            "attachment; filename=\"converted-image.png\""
        );
    }
}
