//! Read-only access to the shop's `templates` table.
//!
//! The [`TemplateStore`] trait is the seam between the commands and storage;
//! [`SqliteStore`] is the production implementation. The schema is owned by
//! the shop's upstream tooling:
//!
//! ```sql
//! CREATE TABLE templates (
//!     id            INTEGER PRIMARY KEY,
//!     title         TEXT NOT NULL,
//!     thumbnail_url TEXT,
//!     is_active     INTEGER NOT NULL DEFAULT 1,
//!     updated_at    TEXT
//! );
//! ```

use crate::types::{Template, TemplateCounts, TemplateListing};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database not found: {0}")]
    NotFound(PathBuf),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Queries the commands need from storage.
pub trait TemplateStore {
    /// Templates whose thumbnail reference is present and non-empty, by id.
    fn templates_with_thumbnails(&self) -> StoreResult<Vec<Template>>;

    /// Active templates for the sitemap, by id.
    fn active_listings(&self) -> StoreResult<Vec<TemplateListing>>;

    /// Row counts for diagnostics.
    fn counts(&self) -> StoreResult<TemplateCounts>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database read-only.
    ///
    /// A missing file is an error rather than an empty new database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!(path = %path.display(), "opened template database");
        Ok(Self { conn })
    }

    /// Wrap an already-open connection (used by tests with in-memory databases).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl TemplateStore for SqliteStore {
    fn templates_with_thumbnails(&self) -> StoreResult<Vec<Template>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, thumbnail_url FROM templates
             WHERE thumbnail_url IS NOT NULL AND thumbnail_url != ''
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Template {
                id: row.get(0)?,
                title: row.get(1)?,
                thumbnail_url: row.get(2)?,
            })
        })?;
        let templates = rows.collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = templates.len(), "loaded templates with thumbnails");
        Ok(templates)
    }

    fn active_listings(&self) -> StoreResult<Vec<TemplateListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, updated_at FROM templates
             WHERE is_active = 1
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TemplateListing {
                id: row.get(0)?,
                updated_at: row.get(1)?,
            })
        })?;
        let listings = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(listings)
    }

    fn counts(&self) -> StoreResult<TemplateCounts> {
        let counts = self.conn.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN thumbnail_url IS NOT NULL AND thumbnail_url != '' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN is_active = 1 THEN 1 ELSE 0 END), 0)
             FROM templates",
            [],
            |row| {
                Ok(TemplateCounts {
                    total: row.get::<_, i64>(0)? as u64,
                    with_thumbnail: row.get::<_, i64>(1)? as u64,
                    active: row.get::<_, i64>(2)? as u64,
                })
            },
        )?;
        Ok(counts)
    }
}
