//! Storage rows shared by the migration, sitemap, and diagnostics commands.
//!
//! Rows are owned by the shop's database; nothing in this crate writes them.

use serde::Serialize;

/// A purchasable invitation-video template, as seen by the thumbnail migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: i64,
    pub title: String,
    /// Web path of the source thumbnail, e.g. `/uploads/templates/bday.jpg`.
    pub thumbnail_url: Option<String>,
}

/// An active template as listed in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateListing {
    pub id: i64,
    /// Last modification timestamp as stored (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`).
    pub updated_at: Option<String>,
}

/// Row counts reported by diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TemplateCounts {
    pub total: u64,
    pub with_thumbnail: u64,
    pub active: u64,
}
