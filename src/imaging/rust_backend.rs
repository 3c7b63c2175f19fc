//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with format sniffing |
//! | Fit | `crop_imm` to the target aspect, then `resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → PNG / TIFF / WebP | `DynamicImage::write_to` (lossless encoders) |

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_crop_box;
use super::params::{EncodeParams, FitParams, OutputFormat, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(source: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Decode an in-memory image, sniffing the format from its magic bytes.
fn load_image(source: &[u8]) -> Result<DynamicImage, BackendError> {
    reader(source)?
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Center-crop to the target aspect, then resize to exactly `width x height`.
fn fit_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let b = calculate_crop_box((img.width(), img.height()), (width, height));
    img.crop_imm(b.x, b.y, b.width, b.height)
        .resize_exact(width, height, FilterType::Lanczos3)
}

/// Encode a DynamicImage into `format`.
fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Cursor::new(Vec::new());
    let encode_err = |e: image::ImageError| BackendError::Encode(format!("{format}: {e}"));

    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            rgb.write_with_encoder(encoder).map_err(encode_err)?;
        }
        OutputFormat::Png => img.write_to(&mut buf, ImageFormat::Png).map_err(encode_err)?,
        OutputFormat::Tiff => img.write_to(&mut buf, ImageFormat::Tiff).map_err(encode_err)?,
        OutputFormat::WebP => {
            // The lossless WebP encoder only accepts 8-bit RGB(A)
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut buf, ImageFormat::WebP).map_err(encode_err)?;
        }
    }

    Ok(buf.into_inner())
}

impl ImageBackend for RustBackend {
    fn fit(&self, source: &[u8], params: &FitParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(source)?;
        let fitted = fit_image(&img, params.width, params.height);
        encode_image(&fitted, params.format, params.quality)
    }

    fn reencode(&self, source: &[u8], params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(source)?;
        encode_image(&img, params.format, params.quality)
    }
}
