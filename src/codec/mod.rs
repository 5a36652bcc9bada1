//! External codec capability.
//!
//! The engine only selects and parametrizes a codec call; the bitstream work
//! happens behind [`ImageCodec`].

pub mod image_codec;

pub use image_codec::ImageRsCodec;

use crate::error::CodecError;
use crate::models::{EncodeParameters, SupportedFormat};

/// Decode arbitrary supported image bytes and re-encode them to `target`.
///
/// Implementations must auto-detect the input encoding from the bytes and
/// must not retain state between calls.
pub trait ImageCodec: Send + Sync {
    fn transcode(
        &self,
        payload: &[u8],
        target: SupportedFormat,
        params: EncodeParameters,
    ) -> Result<Vec<u8>, CodecError>;
}
