//! Pure Rust decoding plus libwebp encoding.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate decoders |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → lossy WebP | `webp::Encoder` |
//!
//! Every output is written to a temporary file in the target directory and
//! then persisted (renamed) into place, so a reader never observes a
//! half-written variant. The temporary file is removed if the write fails.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ResizeParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Backend using the `image` crate for decode/resize and `webp` for encoding.
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

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode to lossy WebP bytes. libwebp only accepts 8-bit RGB/RGBA input.
fn encode_webp(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let normalized = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let encoder = webp::Encoder::from_image(&normalized)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {e}")))?;
    let encoded = encoder.encode(quality as f32);
    if encoded.is_empty() {
        return Err(BackendError::ProcessingFailed(
            "WebP encode produced no data".into(),
        ));
    }
    Ok(encoded.to_vec())
}

/// Write bytes to a temp file beside `path`, then rename it into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "webp" => write_atomic(path, &encode_webp(img, quality)?),
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}

/// Whether the WebP encoder works in this build (encodes a 1×1 pixel in memory).
pub fn webp_encoding_available() -> bool {
    let probe = DynamicImage::ImageRgb8(image::RgbImage::new(1, 1));
    encode_webp(&probe, 70).is_ok()
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        tracing::debug!(
            output = %params.output.display(),
            width = params.width,
            height = params.height,
            quality = params.quality.value(),
            "encoding variant"
        );
        save_image(&resized, &params.output, params.quality.value())
    }
}
