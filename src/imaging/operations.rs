//! High-level image operations.
//!
//! Combines calculations with backend execution: takes a [`VariantConfig`],
//! computes per-width parameters, and calls the backend once per width.
//!
//! The smallest width is the migration's "already done" marker, so it is
//! always encoded last and only after every other width succeeded.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{scaled_dimensions, smallest_width};
use super::params::{Quality, ResizeParams};
use crate::naming::variant_filename;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What to do when one width of a variant set fails to encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantErrorPolicy {
    /// Stop at the first failing width.
    #[default]
    Abort,
    /// Attempt every width and report all failures together.
    Continue,
}

/// Configuration for variant generation.
#[derive(Debug, Clone)]
pub struct VariantConfig {
    pub widths: Vec<u32>,
    pub quality: Quality,
    pub on_error: VariantErrorPolicy,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            widths: vec![315, 472, 630],
            quality: Quality::default(),
            on_error: VariantErrorPolicy::default(),
        }
    }
}

/// One written variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedVariant {
    pub width: u32,
    pub height: u32,
    pub path: PathBuf,
}

/// A width that could not be produced.
#[derive(Debug)]
pub struct WidthFailure {
    /// `None` when the source itself could not be identified.
    pub width: Option<u32>,
    pub error: BackendError,
}

/// Variant generation did not complete.
///
/// Files listed in `written` remain on disk; there is no rollback.
#[derive(Error, Debug)]
#[error("{}", format_failures(.failures))]
pub struct VariantError {
    pub written: Vec<GeneratedVariant>,
    pub failures: Vec<WidthFailure>,
}

/// `315w: reason; 630w: reason`
fn format_failures(failures: &[WidthFailure]) -> String {
    failures
        .iter()
        .map(|failure| match failure.width {
            Some(w) => format!("{}w: {}", w, failure.error),
            None => failure.error.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Create one WebP variant per configured width.
///
/// Each output is `output_dir/{base_filename}-{width}w.webp`, scaled so its
/// width equals the target. Any failed width makes the whole call an `Err`;
/// whether later widths are still attempted depends on `config.on_error`.
/// The smallest width is encoded last and skipped entirely once another
/// width has failed. Results are reported in `config.widths` order.
pub fn generate_variants(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    base_filename: &str,
    config: &VariantConfig,
) -> Result<Vec<GeneratedVariant>, VariantError> {
    let dims = backend.identify(source).map_err(|error| VariantError {
        written: Vec::new(),
        failures: vec![WidthFailure { width: None, error }],
    })?;

    let mut written = Vec::new();
    let mut failures = Vec::new();

    let marker = smallest_width(&config.widths);
    let order = config
        .widths
        .iter()
        .copied()
        .filter(|&w| Some(w) != marker)
        .chain(marker);

    for width in order {
        if Some(width) == marker && !failures.is_empty() {
            break;
        }
        let (width, height) = scaled_dimensions((dims.width, dims.height), width);
        let path = output_dir.join(variant_filename(base_filename, width));

        let result = backend.resize(&ResizeParams {
            source: source.to_path_buf(),
            output: path.clone(),
            width,
            height,
            quality: config.quality,
        });

        match result {
            Ok(()) => written.push(GeneratedVariant {
                width,
                height,
                path,
            }),
            Err(error) => {
                failures.push(WidthFailure {
                    width: Some(width),
                    error,
                });
                if config.on_error == VariantErrorPolicy::Abort {
                    break;
                }
            }
        }
    }

    let position = |w: u32| config.widths.iter().position(|&c| c == w);
    written.sort_by_key(|v: &GeneratedVariant| position(v.width));
    failures.sort_by_key(|f: &WidthFailure| f.width.and_then(position));

    if failures.is_empty() {
        Ok(written)
    } else {
        Err(VariantError { written, failures })
    }
}
