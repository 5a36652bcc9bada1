pub mod conversion_service;
pub mod converter;
pub mod envelope;
pub mod page_service;
pub mod quality;

pub use conversion_service::ConversionService;
pub use converter::{convert, Converter, Stage};
pub use page_service::{PageError, PageService};
pub use quality::{normalize, QualityRule};
