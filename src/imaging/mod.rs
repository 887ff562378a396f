//! Image processing for responsive template thumbnails.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | `resize_exact` with Lanczos3 |
//! | **Encode** | lossy WebP via `webp` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`generate_variants`], combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{scaled_dimensions, smallest_width};
pub use operations::{
    GeneratedVariant, VariantConfig, VariantError, VariantErrorPolicy, WidthFailure,
    generate_variants,
};
pub use params::{Quality, ResizeParams};
pub use rust_backend::{RustBackend, webp_encoding_available};
