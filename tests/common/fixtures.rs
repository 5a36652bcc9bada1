//! Test fixtures: small images generated in memory.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// Formats the codec can decode
#[cfg(feature = "avif-decode")]
pub const DECODABLE: [&str; 6] = ALL;

/// Formats the codec can decode
#[cfg(not(feature = "avif-decode"))]
pub const DECODABLE: [&str; 5] = ["jpeg", "png", "webp", "tiff", "gif"];

/// Every supported format
pub const ALL: [&str; 6] = ["jpeg", "png", "webp", "tiff", "gif", "avif"];

/// Gradient test image
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

/// Image with a handful of flat colors and alpha, suitable for palettes
pub fn blocks(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| match ((x / 8) + (y / 8)) % 4 {
        0 => Rgba([255, 0, 0, 255]),
        1 => Rgba([0, 255, 0, 255]),
        2 => Rgba([0, 0, 255, 255]),
        _ => Rgba([255, 255, 255, 255]),
    })
}

fn image_format(label: &str) -> ImageFormat {
    match label {
        "jpeg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
        "webp" => ImageFormat::WebP,
        "tiff" => ImageFormat::Tiff,
        "gif" => ImageFormat::Gif,
        "avif" => ImageFormat::Avif,
        other => panic!("no fixture encoder for {other}"),
    }
}

/// Encode a test image in the given format
pub fn sample(label: &str) -> Vec<u8> {
    let image = match label {
        "gif" | "png" => DynamicImage::ImageRgba8(blocks(32, 24)),
        _ => DynamicImage::ImageRgb8(gradient(32, 24)),
    };
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image_format(label))
        .expect("Failed to encode fixture");
    out.into_inner()
}

/// Bytes that no decoder accepts
pub fn garbage() -> Vec<u8> {
    b"definitely not an image, just some text".to_vec()
}

/// Identify an encoded image by its magic bytes
pub fn sniff_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpeg")
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        Some("tiff")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" && &bytes[8..12] == b"avif" {
        Some("avif")
    } else {
        None
    }
}
