use crate::error::CodecError;
use crate::models::{CodecConfig, EncodeParameters, SupportedFormat};
use image::codecs::avif::AvifEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::tiff::TiffEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat};
use std::io::Cursor;

use super::ImageCodec;

/// Quality handed to lossy encoders when the caller supplies none
const FALLBACK_QUALITY: u8 = 80;

/// Codec backed by the `image` crate, with libwebp for lossy WebP and
/// png + oxipng for tunable PNG compression.
///
/// Decoding auto-detects every format enabled on the `image` crate. AVIF
/// input is decoded through dav1d when the `avif-decode` feature is on.
#[derive(Debug, Clone)]
pub struct ImageRsCodec {
    avif_speed: u8,
}

impl ImageRsCodec {
    pub fn new(avif_speed: u8) -> Self {
        Self {
            avif_speed: avif_speed.clamp(1, 10),
        }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.avif_speed)
    }
}

impl Default for ImageRsCodec {
    fn default() -> Self {
        Self::from_config(&CodecConfig::default())
    }
}

impl ImageCodec for ImageRsCodec {
    fn transcode(
        &self,
        payload: &[u8],
        target: SupportedFormat,
        params: EncodeParameters,
    ) -> Result<Vec<u8>, CodecError> {
        let image = decode(payload)?;

        tracing::trace!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded input image"
        );

        match target {
            SupportedFormat::Jpeg => encode_jpeg(&image, lossy_quality(params)),
            SupportedFormat::Png => encode_png(&image, compression_level(params)),
            SupportedFormat::Webp => encode_webp(&image, lossy_quality(params)),
            SupportedFormat::Tiff => encode_tiff(&image),
            SupportedFormat::Gif => encode_gif(&image),
            SupportedFormat::Avif => encode_avif(&image, lossy_quality(params), self.avif_speed),
        }
    }
}

/// Decode by content. AVIF is detected from its `ftyp` brand so files with
/// any `ftyp` box size reach the AV1 decoder.
fn decode(payload: &[u8]) -> Result<DynamicImage, CodecError> {
    let decoded = if is_avif(payload) {
        image::load_from_memory_with_format(payload, ImageFormat::Avif)
    } else {
        image::load_from_memory(payload)
    };
    decoded.map_err(|e| CodecError::Decode(e.to_string()))
}

fn is_avif(payload: &[u8]) -> bool {
    payload.len() >= 12
        && &payload[4..8] == b"ftyp"
        && matches!(&payload[8..12], b"avif" | b"avis")
}

fn lossy_quality(params: EncodeParameters) -> u8 {
    match params {
        EncodeParameters::Quality(q) => q,
        _ => FALLBACK_QUALITY,
    }
}

fn compression_level(params: EncodeParameters) -> Option<u8> {
    match params {
        EncodeParameters::CompressionLevel(level) => Some(level),
        _ => None,
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CodecError> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CodecError::encode(SupportedFormat::Jpeg, e))?;
    Ok(buf)
}

/// Encode PNG with fast deflate, then re-compress with oxipng at a preset
/// derived from the 0-9 compression level. Level 0 skips re-compression.
///
/// The source bit depth is kept, so 16-bit input stays 16-bit.
fn encode_png(image: &DynamicImage, level: Option<u8>) -> Result<Vec<u8>, CodecError> {
    let (color_type, bit_depth, data) = png_samples(image);

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::encode(SupportedFormat::Png, e))?;
        writer
            .write_image_data(&data)
            .map_err(|e| CodecError::encode(SupportedFormat::Png, e))?;
        writer
            .finish()
            .map_err(|e| CodecError::encode(SupportedFormat::Png, e))?;
    }
    let png_bytes = buf.into_inner();

    let level = level.unwrap_or(6);
    if level == 0 {
        return Ok(png_bytes);
    }
    Ok(optimize_png(png_bytes, level))
}

/// Raw PNG samples in the image's own layout. 16-bit samples are big-endian.
fn png_samples(image: &DynamicImage) -> (png::ColorType, png::BitDepth, Vec<u8>) {
    use png::{BitDepth, ColorType};

    match image {
        DynamicImage::ImageLuma8(buf) => (ColorType::Grayscale, BitDepth::Eight, buf.to_vec()),
        DynamicImage::ImageLumaA8(buf) => {
            (ColorType::GrayscaleAlpha, BitDepth::Eight, buf.to_vec())
        }
        DynamicImage::ImageRgb8(buf) => (ColorType::Rgb, BitDepth::Eight, buf.to_vec()),
        DynamicImage::ImageRgba8(buf) => (ColorType::Rgba, BitDepth::Eight, buf.to_vec()),
        DynamicImage::ImageLuma16(buf) => {
            (ColorType::Grayscale, BitDepth::Sixteen, big_endian(buf))
        }
        DynamicImage::ImageLumaA16(buf) => {
            (ColorType::GrayscaleAlpha, BitDepth::Sixteen, big_endian(buf))
        }
        DynamicImage::ImageRgb16(buf) => (ColorType::Rgb, BitDepth::Sixteen, big_endian(buf)),
        DynamicImage::ImageRgba16(buf) => (ColorType::Rgba, BitDepth::Sixteen, big_endian(buf)),
        // Float sources keep as much precision as PNG allows
        DynamicImage::ImageRgb32F(_) => (
            ColorType::Rgb,
            BitDepth::Sixteen,
            big_endian(&image.to_rgb16()),
        ),
        DynamicImage::ImageRgba32F(_) => (
            ColorType::Rgba,
            BitDepth::Sixteen,
            big_endian(&image.to_rgba16()),
        ),
        _ if image.color().has_alpha() => {
            (ColorType::Rgba, BitDepth::Eight, image.to_rgba8().into_raw())
        }
        _ => (ColorType::Rgb, BitDepth::Eight, image.to_rgb8().into_raw()),
    }
}

fn big_endian(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

/// Re-compress with oxipng. On failure the input is returned unchanged.
fn optimize_png(png_bytes: Vec<u8>, level: u8) -> Vec<u8> {
    let mut options = oxipng::Options::from_preset(oxipng_preset(level));
    options.strip = oxipng::StripChunks::Safe;
    options.optimize_alpha = false;

    match oxipng::optimize_from_memory(&png_bytes, &options) {
        Ok(optimized) => optimized,
        Err(e) => {
            tracing::warn!(
                error = %e,
                level,
                "PNG optimization failed, keeping unoptimized output"
            );
            png_bytes
        }
    }
}

/// Map a 0-9 compression level onto oxipng's 0-6 presets, rounding halves up
fn oxipng_preset(level: u8) -> u8 {
    ((level.min(9) as u32 * 6 + 4) / 9) as u8
}

fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CodecError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| CodecError::encode(SupportedFormat::Webp, "Failed to create WebP config"))?;
    config.lossless = 0;
    config.quality = quality as f32;

    let output = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
            .encode_advanced(&config)
            .map_err(|e| CodecError::encode(SupportedFormat::Webp, format!("{e:?}")))?
            .to_vec()
    } else {
        let rgb = image.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
            .encode_advanced(&config)
            .map_err(|e| CodecError::encode(SupportedFormat::Webp, format!("{e:?}")))?
            .to_vec()
    };

    Ok(output)
}

/// TIFF is written losslessly; the quality parameter has no effect on this encoder.
fn encode_tiff(image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = TiffEncoder::new(&mut buf);
    let result = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        encoder.write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
    } else {
        let rgb = image.to_rgb8();
        encoder.write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
    };
    result.map_err(|e| CodecError::encode(SupportedFormat::Tiff, e))?;
    Ok(buf.into_inner())
}

fn encode_gif(image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let rgba = image.to_rgba8();
    let mut buf = Vec::new();
    {
        // The trailer is written when the encoder is dropped
        let mut encoder = GifEncoder::new(&mut buf);
        encoder
            .encode(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| CodecError::encode(SupportedFormat::Gif, e))?;
    }
    Ok(buf)
}

fn encode_avif(image: &DynamicImage, quality: u8, speed: u8) -> Result<Vec<u8>, CodecError> {
    let rgba = image.to_rgba8();
    let mut buf = Vec::new();
    AvifEncoder::new_with_speed_quality(&mut buf, speed, quality)
        .write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| CodecError::encode(SupportedFormat::Avif, e))?;
    Ok(buf)
}
