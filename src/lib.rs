//! # invite-media
//!
//! Asset tooling for an invitation-video template shop. The shop's web layer
//! lives elsewhere; this crate owns the batch jobs around its template
//! catalogue.
//!
//! # Commands
//!
//! ```text
//! migrate       template thumbnails  →  {base}-{width}w.webp variants
//! sitemap       static routes + active templates  →  sitemap.xml
//! diagnostics   paths, database, encoder, lock  →  report (text or JSON)
//! gen-config    documented stock invite-media.toml
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`migrate`] | Batch runner: skip/fail/success classification over every template |
//! | [`imaging`] | Variant generation: identify, resize, WebP encode behind [`imaging::ImageBackend`] |
//! | [`naming`] | Thumbnail reference → base filename, variant names, source paths |
//! | [`store`] | Read-only template queries behind [`store::TemplateStore`] (SQLite) |
//! | [`sitemap`] | Sitemap XML built with Maud |
//! | [`diagnostics`] | Environment report for operators |
//! | [`config`] | `invite-media.toml` loading, layering over defaults, validation |
//! | [`types`] | Storage rows shared between commands |
//! | [`output`] | Stdout formatting; the migration log format is a contract |
//!
//! # Design Decisions
//!
//! ## Files On Disk Are The Only State
//!
//! No manifest tracks which variants exist. A template counts as migrated
//! when its marker variant is present, so deleting a variant is all it takes
//! to regenerate it, and a re-run after a crash simply picks up where the
//! last one stopped.
//!
//! ## Failures Are Counted, Not Raised
//!
//! A broken thumbnail must not hold the rest of the catalogue hostage. Every
//! record ends up in exactly one bucket (success, skipped, failed) and the run
//! always reaches its summary. The process exit status still distinguishes a
//! clean run (0) from one with failed records (2).
//!
//! ## One Output Format
//!
//! Variants are WebP only. Browser support is universal and a single format
//! keeps `srcset` markup and the upload directory simple.

pub mod config;
pub mod diagnostics;
pub mod imaging;
pub mod migrate;
pub mod naming;
pub mod output;
pub mod sitemap;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
