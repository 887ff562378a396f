//! Environment diagnostics for operators.
//!
//! Answers "why isn't the migration doing anything on this server?" without
//! touching any data: directory permissions, database reachability, whether
//! the WebP encoder works, how many variants already exist, and whether a
//! migration lock is held. Every probe is read-only except the writability
//! check, which creates an anonymous temp file that vanishes when closed.

use crate::config::AppConfig;
use crate::imaging::webp_encoding_available;
use crate::migrate::LOCK_FILENAME;
use crate::naming::is_variant_filename;
use crate::store::{StoreError, TemplateStore};
use crate::types::TemplateCounts;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// State of one configured directory.
#[derive(Debug, Clone, Serialize)]
pub struct PathCheck {
    pub path: PathBuf,
    pub exists: bool,
    pub is_dir: bool,
    pub writable: bool,
}

impl PathCheck {
    pub fn probe(path: &Path) -> Self {
        let exists = path.exists();
        let is_dir = path.is_dir();
        Self {
            path: path.to_path_buf(),
            exists,
            is_dir,
            writable: is_dir && is_writable(path),
        }
    }
}

/// Database reachability and row counts.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseCheck {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<TemplateCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full diagnostics report.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub version: String,
    pub os: String,
    pub arch: String,
    pub config_path: PathBuf,
    pub config_found: bool,
    pub document_root: PathCheck,
    pub upload_directory: PathCheck,
    pub database: DatabaseCheck,
    pub webp_encoder: bool,
    pub variants_on_disk: usize,
    pub migration_locked: bool,
    pub widths: Vec<u32>,
    pub quality: u32,
}

fn is_writable(dir: &Path) -> bool {
    match tempfile::tempfile_in(dir) {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "write probe failed");
            false
        }
    }
}

/// Count generated variant files below `dir` (recursively).
pub fn count_variants(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_variant_filename(&e.file_name().to_string_lossy()))
        .count()
}

/// Gather a report. `store` is the result of opening the database, so an
/// unreachable database shows up in the report instead of aborting it.
pub fn collect<S: TemplateStore>(
    version: &str,
    config: &AppConfig,
    config_path: &Path,
    config_found: bool,
    store: Result<S, StoreError>,
) -> Diagnostics {
    let counts = store.and_then(|s| s.counts());
    let database = match counts {
        Ok(c) => DatabaseCheck {
            path: config.database.clone(),
            counts: Some(c),
            error: None,
        },
        Err(e) => DatabaseCheck {
            path: config.database.clone(),
            counts: None,
            error: Some(e.to_string()),
        },
    };

    Diagnostics {
        version: version.to_string(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        config_path: config_path.to_path_buf(),
        config_found,
        document_root: PathCheck::probe(&config.document_root),
        upload_directory: PathCheck::probe(&config.upload_directory),
        database,
        webp_encoder: webp_encoding_available(),
        variants_on_disk: count_variants(&config.upload_directory),
        migration_locked: config.upload_directory.join(LOCK_FILENAME).exists(),
        widths: config.thumbnails.widths.clone(),
        quality: config.thumbnails.quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use crate::test_helpers::{TestSite, memory_store};

    fn config_for(site: &TestSite) -> AppConfig {
        AppConfig {
            document_root: site.document_root(),
            upload_directory: site.upload_dir(),
            database: site.tmp.path().join("shop.db"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn healthy_environment() {
        let site = TestSite::new();
        site.touch_variant("bday-315w.webp");
        site.touch_variant("bday-472w.webp");
        std::fs::write(site.upload_dir().join("bday.jpg"), b"").unwrap();
        let store = memory_store(&[(1, "Birthday", Some("/uploads/templates/bday.jpg"))]);

        let report = collect(
            "0.1.0",
            &config_for(&site),
            Path::new("invite-media.toml"),
            true,
            Ok(store),
        );

        assert!(report.document_root.exists && report.document_root.is_dir);
        assert!(report.upload_directory.writable);
        assert_eq!(report.database.counts.map(|c| c.with_thumbnail), Some(1));
        assert!(report.database.error.is_none());
        assert_eq!(report.variants_on_disk, 2);
        assert!(!report.migration_locked);
        assert!(report.webp_encoder);
        // Nothing but the files above is left in the upload directory
        assert_eq!(std::fs::read_dir(site.upload_dir()).unwrap().count(), 3);
    }

    #[test]
    fn leftover_files_do_not_affect_writability() {
        let site = TestSite::new();
        // Stale dotfile left by an interrupted run
        std::fs::write(site.upload_dir().join(".invite-media-write-check"), b"").unwrap();

        let check = PathCheck::probe(&site.upload_dir());

        assert!(check.writable);
    }

    #[test]
    fn unreachable_database_is_reported_not_fatal() {
        let site = TestSite::new();
        let config = config_for(&site);
        let store = SqliteStore::open(&config.database);

        let report = collect("0.1.0", &config, Path::new("x.toml"), false, store);

        assert!(report.database.counts.is_none());
        assert!(
            report
                .database
                .error
                .as_deref()
                .is_some_and(|e| e.contains("database not found"))
        );
    }

    #[test]
    fn missing_directories_and_held_lock() {
        let site = TestSite::new();
        let mut config = config_for(&site);
        config.document_root = site.tmp.path().join("nowhere");
        std::fs::write(site.upload_dir().join(LOCK_FILENAME), b"123\n").unwrap();

        let report = collect(
            "0.1.0",
            &config,
            Path::new("x.toml"),
            true,
            Ok(memory_store(&[])),
        );

        assert!(!report.document_root.exists);
        assert!(!report.document_root.writable);
        assert!(report.migration_locked);
    }

    #[test]
    fn count_variants_is_recursive_and_selective() {
        let site = TestSite::new();
        site.touch_variant("a-315w.webp");
        let nested = site.upload_dir().join("archive");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("b-630w.webp"), b"").unwrap();
        std::fs::write(nested.join("b.webp"), b"").unwrap();

        assert_eq!(count_variants(&site.upload_dir()), 2);
    }

    #[test]
    fn count_variants_missing_dir_is_zero() {
        assert_eq!(count_variants(Path::new("/nonexistent/uploads")), 0);
    }

    #[test]
    fn report_serializes_to_json() {
        let site = TestSite::new();
        let report = collect(
            "0.1.0",
            &config_for(&site),
            Path::new("invite-media.toml"),
            true,
            Ok(memory_store(&[])),
        );
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["version"], "0.1.0");
        assert_eq!(json["database"]["counts"]["total"], 0);
        assert!(json["database"].get("error").is_none());
        assert_eq!(json["widths"][0], 315);
    }
}
