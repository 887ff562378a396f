//! Shared test utilities.
//!
//! Provides an in-memory template store, synthetic source images, and a
//! ready-made document root so migration tests read like the scenarios they
//! check:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = TestSite::new();
//! site.add_source("/uploads/templates/bday.jpg", 1260, 700);
//! let store = memory_store(&[(1, "Birthday", Some("/uploads/templates/bday.jpg"))]);
//! ```

use crate::store::SqliteStore;
use image::{ImageEncoder, RgbImage};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Schema of the shop's `templates` table.
pub const TEMPLATES_SCHEMA: &str = "CREATE TABLE templates (
    id            INTEGER PRIMARY KEY,
    title         TEXT NOT NULL,
    thumbnail_url TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    updated_at    TEXT
);";

// =========================================================================
// Storage
// =========================================================================

/// In-memory store seeded with `(id, title, thumbnail_url)` rows.
pub fn memory_store(rows: &[(i64, &str, Option<&str>)]) -> SqliteStore {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(TEMPLATES_SCHEMA).unwrap();
    for (id, title, thumb) in rows {
        conn.execute(
            "INSERT INTO templates (id, title, thumbnail_url) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, title, thumb],
        )
        .unwrap();
    }
    SqliteStore::from_connection(conn)
}

// =========================================================================
// Images
// =========================================================================

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

// =========================================================================
// Site layout
// =========================================================================

/// A temporary document root with an upload directory inside it.
pub struct TestSite {
    pub tmp: TempDir,
}

impl TestSite {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("public/uploads/templates")).unwrap();
        Self { tmp }
    }

    pub fn document_root(&self) -> PathBuf {
        self.tmp.path().join("public")
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.document_root().join("uploads/templates")
    }

    /// Write a synthetic JPEG at a web-path reference under the document root.
    pub fn add_source(&self, thumbnail_ref: &str, width: u32, height: u32) -> PathBuf {
        let path = crate::naming::resolve_source(&self.document_root(), thumbnail_ref);
        create_test_jpeg(&path, width, height);
        path
    }

    /// Pretend a variant was produced by an earlier run.
    pub fn touch_variant(&self, name: &str) {
        std::fs::write(self.upload_dir().join(name), b"").unwrap();
    }

    pub fn has_variant(&self, name: &str) -> bool {
        self.upload_dir().join(name).exists()
    }

    /// Sorted names of the variant files in the upload directory.
    pub fn variant_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| crate::naming::is_variant_filename(n))
            .collect();
        names.sort();
        names
    }
}
