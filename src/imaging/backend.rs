//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the variant pipeline
//! needs: identify and resize. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Treated as a black box by the rest of the crate: give it a source raster
/// and target dimensions, get back a re-encoded file at `params.output`.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize `params.source` to exactly `width`×`height` and encode to
    /// `params.output` at `params.quality`.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
