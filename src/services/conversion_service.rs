use crate::error::ConversionError;
use crate::models::{ConversionRequest, ConversionResult};
use crate::services::Converter;

/// Async front end for [`Converter`]
#[derive(Clone)]
pub struct ConversionService {
    converter: Converter,
}

impl ConversionService {
    pub fn new(converter: Converter) -> Self {
        Self { converter }
    }

    /// Convert an image
    ///
    /// Uses spawn_blocking to avoid blocking the async runtime during
    /// CPU-intensive decode and encode work.
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let converter = self.converter.clone();

        tokio::task::spawn_blocking(move || converter.convert(&request))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Conversion task failed");
                ConversionError::ConversionFailed
            })?
    }
}

impl Default for ConversionService {
    fn default() -> Self {
        Self::new(Converter::default())
    }
}
