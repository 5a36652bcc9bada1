pub mod convert;
pub mod formats;
pub mod headers;
pub mod pages;

pub use convert::{__path_handle_convert, __path_handle_convert_status};
pub use convert::{
    handle_convert, handle_convert_options, handle_convert_status, ConvertStatusResponse,
    ConvertUpload, ErrorResponse,
};
pub use formats::{handle_formats, FormatInfo, FormatsResponse, __path_handle_formats};
pub use pages::{handle_converter_page, handle_home, handle_sitemap};
