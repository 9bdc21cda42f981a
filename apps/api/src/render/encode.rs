//! Image encoding for rendered cards.
//!
//! WebP uses the pure-Rust lossless encoder, so `quality` only affects JPEG.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::render::{ImageFormat, RenderError};

pub fn encode_image(
    image: &RgbImage,
    format: ImageFormat,
    quality: u8,
) -> Result<Bytes, RenderError> {
    let (width, height) = image.dimensions();
    let mut buffer: Vec<u8> = Vec::new();

    match format {
        ImageFormat::Webp => WebPEncoder::new_lossless(&mut buffer).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
        )?,
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)?,
        ImageFormat::Png => PngEncoder::new(&mut buffer).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
        )?,
    }

    Ok(Bytes::from(buffer))
}
