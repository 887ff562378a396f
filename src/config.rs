//! Application configuration.
//!
//! Handles loading, validating, and layering `invite-media.toml`. User values
//! are merged on top of stock defaults, so a config file only needs the keys
//! it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! database = "data/invitations.db"          # SQLite catalogue (opened read-only)
//! document_root = "public"                  # Thumbnail references resolve under here
//! upload_directory = "public/uploads/templates"  # Variants are written here
//!
//! [thumbnails]
//! widths = [315, 472, 630]      # Variant widths in pixels
//! quality = 70                  # WebP quality (1-100)
//! on_variant_error = "abort"    # "abort" | "continue"
//! skip_check = "smallest"       # "smallest" | "complete"
//!
//! [sitemap]
//! site_url = "https://example.com"
//! static_routes = ["/", "/templates", "/how-it-works", "/contact"]
//! template_route = "/templates/{id}"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, VariantConfig, VariantErrorPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "invite-media.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0} (run `invite-media gen-config` to create one)")]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Path to the SQLite template catalogue.
    pub database: PathBuf,
    /// Web document root; thumbnail references are resolved under it.
    pub document_root: PathBuf,
    /// Directory receiving generated variants.
    pub upload_directory: PathBuf,
    /// Variant generation settings.
    pub thumbnails: ThumbnailsConfig,
    /// Sitemap settings.
    pub sitemap: SitemapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("data/invitations.db"),
            document_root: PathBuf::from("public"),
            upload_directory: PathBuf::from("public/uploads/templates"),
            thumbnails: ThumbnailsConfig::default(),
            sitemap: SitemapConfig::default(),
        }
    }
}

/// Which existing files let the migration skip a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipCheck {
    /// Skip when the smallest-width variant exists.
    #[default]
    Smallest,
    /// Skip only when every configured width exists.
    Complete,
}

/// Variant generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Variant widths in pixels, generated in this order.
    pub widths: Vec<u32>,
    /// WebP encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Behavior when one width fails.
    pub on_variant_error: VariantErrorPolicy,
    /// Idempotence marker used to skip already-migrated templates.
    pub skip_check: SkipCheck,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            widths: vec![315, 472, 630],
            quality: 70,
            on_variant_error: VariantErrorPolicy::Abort,
            skip_check: SkipCheck::Smallest,
        }
    }
}

impl ThumbnailsConfig {
    pub fn variant_config(&self) -> VariantConfig {
        VariantConfig {
            widths: self.widths.clone(),
            quality: Quality::new(self.quality),
            on_error: self.on_variant_error,
        }
    }
}

/// Sitemap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Public origin, without a trailing slash.
    pub site_url: String,
    /// Fixed routes listed before templates.
    pub static_routes: Vec<String>,
    /// Route of a template detail page; `{id}` is replaced by the template id.
    pub template_route: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            site_url: "https://example.com".to_string(),
            static_routes: vec![
                "/".to_string(),
                "/templates".to_string(),
                "/how-it-works".to_string(),
                "/contact".to_string(),
            ],
            template_route: "/templates/{id}".to_string(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thumbnails;
        if t.widths.is_empty() {
            return Err(ConfigError::Validation(
                "thumbnails.widths must not be empty".into(),
            ));
        }
        if t.widths.contains(&0) {
            return Err(ConfigError::Validation(
                "thumbnails.widths values must be non-zero".into(),
            ));
        }
        let mut sorted = t.widths.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != t.widths.len() {
            return Err(ConfigError::Validation(
                "thumbnails.widths must not contain duplicates".into(),
            ));
        }
        if !(1..=100).contains(&t.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.upload_directory.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "upload_directory must not be empty".into(),
            ));
        }
        self.sitemap.validate()
    }
}

impl SitemapConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.site_url.starts_with("http://") || self.site_url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "sitemap.site_url must start with http:// or https://".into(),
            ));
        }
        if self.site_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "sitemap.site_url must not end with '/'".into(),
            ));
        }
        if let Some(bad) = self.static_routes.iter().find(|r| !r.starts_with('/')) {
            return Err(ConfigError::Validation(format!(
                "sitemap.static_routes entry {bad:?} must start with '/'"
            )));
        }
        if !self.template_route.starts_with('/') || !self.template_route.contains("{id}") {
            return Err(ConfigError::Validation(
                "sitemap.template_route must start with '/' and contain {id}".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge user TOML text onto stock defaults, deserialize, and validate.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file. A missing file is [`ConfigError::Missing`].
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load config if the file exists, otherwise fall back to stock defaults.
///
/// Returns whether the file was found alongside the config.
pub fn load_config_or_default(path: &Path) -> Result<(AppConfig, bool), ConfigError> {
    match load_config(path) {
        Ok(config) => Ok((config, true)),
        Err(ConfigError::Missing(_)) => Ok((AppConfig::default(), false)),
        Err(e) => Err(e),
    }
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# invite-media configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# SQLite template catalogue. Opened read-only.
database = "data/invitations.db"

# Web document root. A thumbnail reference like /uploads/templates/bday.jpg
# is read from <document_root>/uploads/templates/bday.jpg.
document_root = "public"

# Where generated variants are written, named {base}-{width}w.webp.
upload_directory = "public/uploads/templates"

# ---------------------------------------------------------------------------
# Responsive thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Variant widths in pixels. Each variant is scaled to exactly this width.
widths = [315, 472, 630]

# WebP encoding quality (1 = worst, 100 = best).
quality = 70

# What happens when one width fails to encode:
#   "abort"    - stop at the first failing width
#   "continue" - try every width, report all failures
# Either way the template is counted as failed.
on_variant_error = "abort"

# Which existing files mark a template as already migrated:
#   "smallest" - the smallest-width variant exists
#   "complete" - every configured width exists
skip_check = "smallest"

# ---------------------------------------------------------------------------
# Sitemap
# ---------------------------------------------------------------------------
[sitemap]
# Public origin, no trailing slash.
site_url = "https://example.com"

# Fixed pages listed before the templates.
static_routes = ["/", "/templates", "/how-it-works", "/contact"]

# Template detail page; {id} is replaced by the template id.
template_route = "/templates/{id}"
"##
}
