//! CLI output formatting.
//!
//! Stdout is a contract: scripts and operators grep the migration log, so the
//! line shapes below are fixed. Tracing output goes to stderr and never mixes
//! in.
//!
//! # Migration
//!
//! ```text
//! === Responsive Thumbnail Migration ===
//!
//! Found 3 template(s) to process.
//!
//! [OK]   Birthday - generated 3 variant(s)
//! [SKIP] Wedding - variants already exist
//! [FAIL] Baby Shower - source file not found: /uploads/templates/baby.jpg
//!
//! === Summary ===
//! Success: 1
//! Skipped: 1
//! Failed:  1
//! Total:   3
//! ```
//!
//! # Diagnostics
//!
//! ```text
//! invite-media 0.1.0 (linux/x86_64)
//! Config: invite-media.toml (found)
//! Document root: public (ok)
//! Upload directory: public/uploads/templates (ok, writable)
//! Database: data/invitations.db (12 templates, 11 with thumbnails, 10 active)
//! WebP encoder: available
//! Variants on disk: 33
//! Migration lock: free
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` and is pure; the `print_*`
//! wrappers write to stdout.

use crate::diagnostics::{DatabaseCheck, Diagnostics, PathCheck};
use crate::migrate::{MigrationEvent, RunSummary};

// ============================================================================
// Migration
// ============================================================================

pub fn format_migration_header() -> Vec<String> {
    vec![
        "=== Responsive Thumbnail Migration ===".to_string(),
        String::new(),
    ]
}

/// Format one progress event.
pub fn format_migration_event(event: &MigrationEvent) -> Vec<String> {
    match event {
        MigrationEvent::Started { total } => {
            vec![format!("Found {} template(s) to process.", total), String::new()]
        }
        MigrationEvent::Skipped { title } => {
            vec![format!("[SKIP] {} - variants already exist", title)]
        }
        MigrationEvent::SourceMissing {
            title,
            thumbnail_url,
        } => vec![format!(
            "[FAIL] {} - source file not found: {}",
            title, thumbnail_url
        )],
        MigrationEvent::Failed { title, error } => vec![format!("[FAIL] {} - {}", title, error)],
        MigrationEvent::Generated {
            title,
            variant_count,
        } => vec![format!(
            "[OK]   {} - generated {} variant(s)",
            title, variant_count
        )],
    }
}

/// Format the terminal summary block.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    vec![
        String::new(),
        "=== Summary ===".to_string(),
        format!("Success: {}", summary.success),
        format!("Skipped: {}", summary.skipped),
        format!("Failed:  {}", summary.failed),
        format!("Total:   {}", summary.total()),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_migration_event(event: &MigrationEvent) {
    print_lines(&format_migration_event(event));
}

// ============================================================================
// Diagnostics
// ============================================================================

fn path_status(check: &PathCheck, want_writable: bool) -> String {
    if !check.exists {
        return "missing".to_string();
    }
    if !check.is_dir {
        return "not a directory".to_string();
    }
    match (want_writable, check.writable) {
        (true, true) => "ok, writable".to_string(),
        (true, false) => "ok, NOT writable".to_string(),
        (false, _) => "ok".to_string(),
    }
}

fn database_status(db: &DatabaseCheck) -> String {
    match (&db.counts, &db.error) {
        (Some(c), _) => format!(
            "{} templates, {} with thumbnails, {} active",
            c.total, c.with_thumbnail, c.active
        ),
        (None, Some(e)) => format!("unreachable: {}", e),
        (None, None) => "unreachable".to_string(),
    }
}

/// Format the diagnostics report as human-readable lines.
pub fn format_diagnostics(report: &Diagnostics) -> Vec<String> {
    let mut lines = vec![
        format!("invite-media {} ({}/{})", report.version, report.os, report.arch),
        format!(
            "Config: {} ({})",
            report.config_path.display(),
            if report.config_found {
                "found"
            } else {
                "not found, using defaults"
            }
        ),
        format!(
            "Document root: {} ({})",
            report.document_root.path.display(),
            path_status(&report.document_root, false)
        ),
        format!(
            "Upload directory: {} ({})",
            report.upload_directory.path.display(),
            path_status(&report.upload_directory, true)
        ),
        format!(
            "Database: {} ({})",
            report.database.path.display(),
            database_status(&report.database)
        ),
        format!(
            "WebP encoder: {}",
            if report.webp_encoder {
                "available"
            } else {
                "UNAVAILABLE"
            }
        ),
        format!("Variants on disk: {}", report.variants_on_disk),
        format!(
            "Migration lock: {}",
            if report.migration_locked {
                "HELD"
            } else {
                "free"
            }
        ),
    ];
    let widths: Vec<String> = report.widths.iter().map(|w| w.to_string()).collect();
    lines.push(format!(
        "Thumbnail widths: {} @ quality {}",
        widths.join(", "),
        report.quality
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TemplateCounts;
    use std::path::PathBuf;

    #[test]
    fn header_is_title_then_blank() {
        assert_eq!(
            format_migration_header(),
            vec!["=== Responsive Thumbnail Migration ===", ""]
        );
    }

    #[test]
    fn started_line_then_blank() {
        let lines = format_migration_event(&MigrationEvent::Started { total: 4 });
        assert_eq!(lines, vec!["Found 4 template(s) to process.", ""]);
    }

    #[test]
    fn ok_line_has_padded_tag() {
        let lines = format_migration_event(&MigrationEvent::Generated {
            title: "Birthday".into(),
            variant_count: 3,
        });
        assert_eq!(lines, vec!["[OK]   Birthday - generated 3 variant(s)"]);
    }

    #[test]
    fn skip_line() {
        let lines = format_migration_event(&MigrationEvent::Skipped {
            title: "Birthday".into(),
        });
        assert_eq!(lines, vec!["[SKIP] Birthday - variants already exist"]);
    }

    #[test]
    fn missing_source_line_includes_reference() {
        let lines = format_migration_event(&MigrationEvent::SourceMissing {
            title: "Ghost".into(),
            thumbnail_url: "/uploads/templates/ghost.jpg".into(),
        });
        assert_eq!(
            lines,
            vec!["[FAIL] Ghost - source file not found: /uploads/templates/ghost.jpg"]
        );
    }

    #[test]
    fn generator_failure_line() {
        let lines = format_migration_event(&MigrationEvent::Failed {
            title: "A".into(),
            error: "630w: Processing failed: boom".into(),
        });
        assert_eq!(lines, vec!["[FAIL] A - 630w: Processing failed: boom"]);
    }

    #[test]
    fn summary_block_alignment() {
        let lines = format_summary(&RunSummary {
            success: 1,
            skipped: 0,
            failed: 0,
        });
        assert_eq!(
            lines,
            vec![
                "",
                "=== Summary ===",
                "Success: 1",
                "Skipped: 0",
                "Failed:  0",
                "Total:   1",
            ]
        );
    }

    fn sample_report() -> Diagnostics {
        Diagnostics {
            version: "0.1.0".into(),
            os: "linux".into(),
            arch: "x86_64".into(),
            config_path: PathBuf::from("invite-media.toml"),
            config_found: true,
            document_root: PathCheck {
                path: PathBuf::from("public"),
                exists: true,
                is_dir: true,
                writable: true,
            },
            upload_directory: PathCheck {
                path: PathBuf::from("public/uploads/templates"),
                exists: true,
                is_dir: true,
                writable: false,
            },
            database: DatabaseCheck {
                path: PathBuf::from("data/invitations.db"),
                counts: Some(TemplateCounts {
                    total: 12,
                    with_thumbnail: 11,
                    active: 10,
                }),
                error: None,
            },
            webp_encoder: true,
            variants_on_disk: 33,
            migration_locked: false,
            widths: vec![315, 472, 630],
            quality: 70,
        }
    }

    #[test]
    fn diagnostics_lines() {
        let lines = format_diagnostics(&sample_report());
        assert_eq!(lines[0], "invite-media 0.1.0 (linux/x86_64)");
        assert_eq!(lines[1], "Config: invite-media.toml (found)");
        assert_eq!(lines[2], "Document root: public (ok)");
        assert_eq!(
            lines[3],
            "Upload directory: public/uploads/templates (ok, NOT writable)"
        );
        assert_eq!(
            lines[4],
            "Database: data/invitations.db (12 templates, 11 with thumbnails, 10 active)"
        );
        assert_eq!(lines[5], "WebP encoder: available");
        assert_eq!(lines[6], "Variants on disk: 33");
        assert_eq!(lines[7], "Migration lock: free");
        assert_eq!(lines[8], "Thumbnail widths: 315, 472, 630 @ quality 70");
    }

    #[test]
    fn diagnostics_unreachable_database_and_missing_dirs() {
        let mut report = sample_report();
        report.config_found = false;
        report.document_root.exists = false;
        report.database.counts = None;
        report.database.error = Some("database not found: data/invitations.db".into());
        report.migration_locked = true;

        let lines = format_diagnostics(&report);
        assert_eq!(lines[1], "Config: invite-media.toml (not found, using defaults)");
        assert_eq!(lines[2], "Document root: public (missing)");
        assert_eq!(
            lines[4],
            "Database: data/invitations.db (unreachable: database not found: data/invitations.db)"
        );
        assert_eq!(lines[7], "Migration lock: HELD");
    }
}
