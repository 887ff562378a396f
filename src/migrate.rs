//! Responsive-thumbnail migration.
//!
//! One sequential pass over every template with a thumbnail reference. For
//! each record the runner decides between three outcomes:
//!
//! | Outcome | When |
//! |---|---|
//! | **skipped** | the idempotence marker already exists (see [`SkipCheck`]) |
//! | **failed** | the source file is missing, or variant generation failed |
//! | **success** | every configured width was written |
//!
//! A record's failure never stops the run; only setup problems (storage,
//! upload directory, a concurrent run holding the lock) abort before the
//! first record. Re-running is safe: files on disk are the only state.
//!
//! ## Output
//!
//! ```text
//! public/uploads/templates/
//! ├── bday.jpg              # source (any raster format the image crate decodes)
//! ├── bday-315w.webp        # smallest width doubles as the "already migrated" marker
//! ├── bday-472w.webp
//! └── bday-630w.webp
//! ```
//!
//! ## Concurrency
//!
//! Runs are serialized by a `.thumbnail-migration.lock` file in the upload
//! directory, created with create-new semantics and removed when the run
//! ends. Variant files are renamed into place by the backend, so a partially
//! encoded file is never mistaken for a finished one.

use crate::config::{AppConfig, SkipCheck};
use crate::imaging::{ImageBackend, VariantConfig, generate_variants, smallest_width};
use crate::naming::{base_filename, resolve_source, variant_filename};
use crate::store::{StoreError, TemplateStore};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lock file name inside the upload directory.
pub const LOCK_FILENAME: &str = ".thumbnail-migration.lock";

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("no thumbnail widths configured")]
    NoWidths,
    #[error("another migration holds {0}; remove it if no run is active")]
    Locked(PathBuf),
}

/// Everything the runner needs, passed in at construction.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub document_root: PathBuf,
    pub upload_directory: PathBuf,
    pub variants: VariantConfig,
    pub skip_check: SkipCheck,
}

impl MigrationConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            document_root: config.document_root.clone(),
            upload_directory: config.upload_directory.clone(),
            variants: config.thumbnails.variant_config(),
            skip_check: config.thumbnails.skip_check,
        }
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// Progress events, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationEvent {
    Started {
        total: usize,
    },
    Skipped {
        title: String,
    },
    SourceMissing {
        title: String,
        thumbnail_url: String,
    },
    Failed {
        title: String,
        error: String,
    },
    Generated {
        title: String,
        variant_count: usize,
    },
}

/// Tally of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Exclusive lock on the upload directory for the duration of a run.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Create the lock file and record this process id in it.
    pub fn acquire(dir: &Path) -> Result<Self, MigrationError> {
        Self::acquire_with(dir, |file| writeln!(file, "{}", std::process::id()))
    }

    fn acquire_with(
        dir: &Path,
        write_owner: impl FnOnce(&mut File) -> std::io::Result<()>,
    ) -> Result<Self, MigrationError> {
        let path = dir.join(LOCK_FILENAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(MigrationError::Locked(path));
            }
            Err(e) => return Err(e.into()),
        };
        // Guard first: a failed write must still remove the file.
        let lock = Self { path };
        write_owner(&mut file)?;
        Ok(lock)
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove lock file");
        }
    }
}

/// The batch runner.
pub struct Migrator<'a, S, B> {
    config: MigrationConfig,
    store: &'a S,
    backend: &'a B,
}

impl<'a, S: TemplateStore, B: ImageBackend> Migrator<'a, S, B> {
    pub fn new(config: MigrationConfig, store: &'a S, backend: &'a B) -> Self {
        Self {
            config,
            store,
            backend,
        }
    }

    /// Whether the variants that mark `base` as migrated are already on disk.
    fn already_migrated(&self, base: &str) -> bool {
        let widths = &self.config.variants.widths;
        let exists = |w: u32| {
            self.config
                .upload_directory
                .join(variant_filename(base, w))
                .exists()
        };
        match self.config.skip_check {
            SkipCheck::Smallest => smallest_width(widths).is_some_and(exists),
            SkipCheck::Complete => widths.iter().all(|&w| exists(w)),
        }
    }

    /// Process every template with a thumbnail, reporting progress through `on_event`.
    pub fn run(
        &self,
        mut on_event: impl FnMut(&MigrationEvent),
    ) -> Result<RunSummary, MigrationError> {
        if self.config.variants.widths.is_empty() {
            return Err(MigrationError::NoWidths);
        }
        std::fs::create_dir_all(&self.config.upload_directory)?;
        let _lock = RunLock::acquire(&self.config.upload_directory)?;

        let templates = self.store.templates_with_thumbnails()?;
        on_event(&MigrationEvent::Started {
            total: templates.len(),
        });

        let mut summary = RunSummary::default();

        for template in &templates {
            let title = template.title.clone();
            let thumbnail_url = template.thumbnail_url.as_deref().unwrap_or_default();
            let base = base_filename(thumbnail_url);

            if self.already_migrated(base) {
                summary.skipped += 1;
                on_event(&MigrationEvent::Skipped { title });
                continue;
            }

            let source = resolve_source(&self.config.document_root, thumbnail_url);
            if !source.is_file() {
                tracing::debug!(id = template.id, source = %source.display(), "source missing");
                summary.failed += 1;
                on_event(&MigrationEvent::SourceMissing {
                    title,
                    thumbnail_url: thumbnail_url.to_string(),
                });
                continue;
            }

            match generate_variants(
                self.backend,
                &source,
                &self.config.upload_directory,
                base,
                &self.config.variants,
            ) {
                Ok(variants) => {
                    summary.success += 1;
                    on_event(&MigrationEvent::Generated {
                        title,
                        variant_count: variants.len(),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        id = template.id,
                        written = e.written.len(),
                        error = %e,
                        "variant generation failed"
                    );
                    summary.failed += 1;
                    on_event(&MigrationEvent::Failed {
                        title,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }
}
