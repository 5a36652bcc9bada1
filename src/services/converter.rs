//! Conversion dispatch.
//!
//! A call moves through Validating, Normalizing and Encoding, and ends as
//! either a [`ConversionResult`] or a [`ConversionError`]. Nothing is kept
//! between calls, so one `Converter` can serve any number of threads.

use std::fmt;
use std::sync::Arc;

use crate::codec::{ImageCodec, ImageRsCodec};
use crate::error::ConversionError;
use crate::models::{CodecConfig, ConversionRequest, ConversionResult};
use crate::services::{envelope, quality};

/// Step of a conversion call, used in log output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Normalizing,
    Encoding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Normalizing => "normalizing",
            Stage::Encoding => "encoding",
        };
        f.write_str(name)
    }
}

/// Selects and parametrizes the codec call for a conversion request
#[derive(Clone)]
pub struct Converter {
    codec: Arc<dyn ImageCodec>,
}

impl Converter {
    pub fn new(codec: Arc<dyn ImageCodec>) -> Self {
        Self { codec }
    }

    /// Converter backed by [`ImageRsCodec`]
    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(Arc::new(ImageRsCodec::from_config(config)))
    }

    /// Convert a validated request.
    ///
    /// The codec is invoked exactly once. The source format is not used to
    /// pick a decoder; the codec detects the real encoding from the bytes.
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, ConversionError> {
        let source = request.source();
        let target = request.target();

        let params = quality::normalize(target, request.quality().get());
        tracing::debug!(
            stage = %Stage::Normalizing,
            %source,
            %target,
            quality = request.quality().get(),
            ?params,
            "Derived encoder parameters"
        );

        let output = self
            .codec
            .transcode(request.payload(), target, params)
            .map_err(|e| {
                tracing::warn!(
                    stage = %Stage::Encoding,
                    %source,
                    %target,
                    error = %e,
                    "Codec failed to convert image"
                );
                ConversionError::ConversionFailed
            })?;

        if output.is_empty() {
            tracing::warn!(stage = %Stage::Encoding, %target, "Codec returned no output");
            return Err(ConversionError::ConversionFailed);
        }

        tracing::info!(
            %source,
            %target,
            input_bytes = request.payload().len(),
            output_bytes = output.len(),
            "Image converted"
        );

        Ok(envelope::build(output, target))
    }

    /// Validate raw labels and convert.
    ///
    /// `quality` defaults to 80 when absent.
    pub fn convert_labels(
        &self,
        payload: Vec<u8>,
        source: &str,
        target: &str,
        quality: Option<i64>,
    ) -> Result<ConversionResult, ConversionError> {
        let request =
            ConversionRequest::from_labels(payload, Some(source), Some(target), quality)
                .inspect_err(|e| {
                    tracing::debug!(stage = %Stage::Validating, error = %e, "Rejected request")
                })?;
        self.convert(&request)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Arc::new(ImageRsCodec::default()))
    }
}

/// Convert `payload` from `source` to `target` with the default codec
pub fn convert(
    payload: &[u8],
    source: &str,
    target: &str,
    quality: Option<i64>,
) -> Result<ConversionResult, ConversionError> {
    Converter::default().convert_labels(payload.to_vec(), source, target, quality)
}
