pub mod config;
pub mod format;
pub mod request;

pub use config::{AppConfig, CodecConfig, LimitsConfig, SiteConfig};
pub use format::{all_formats, is_supported, listing_pairs, SupportedFormat};
pub use request::{
    ConversionRequest, ConversionResult, EncodeParameters, Quality, DEFAULT_QUALITY,
};
