use crate::models::{ConversionResult, SupportedFormat};

/// Base name offered for every download
pub const FILENAME_STEM: &str = "converted-image";

/// Wrap encoded bytes with metadata derived from the requested target format.
///
/// The content type and filename always follow `target`, never the source
/// format or the codec's own name for the output.
pub fn build(output: Vec<u8>, target: SupportedFormat) -> ConversionResult {
    ConversionResult {
        bytes: output,
        content_type: content_type(target),
        filename: suggested_filename(target),
    }
}

/// `image/{label}`
pub fn content_type(format: SupportedFormat) -> String {
    format!("image/{}", format.label())
}

/// `converted-image.{label}`
pub fn suggested_filename(format: SupportedFormat) -> String {
    format!("{FILENAME_STEM}.{}", format.label())
}
