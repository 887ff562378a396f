//! Centralized naming for thumbnail references and their variants.
//!
//! A template's `thumbnail_url` is a web path such as
//! `/uploads/templates/bday.jpg`. Everything derived from it goes through
//! this module so the migration, the skip check, and diagnostics agree on
//! names:
//!
//! - `/uploads/templates/bday.jpg` → base filename `bday`
//! - base `bday`, width 315 → `bday-315w.webp`
//! - reference resolved under the document root → `{root}/uploads/templates/bday.jpg`

use std::path::{Path, PathBuf};

/// Extension of every generated variant.
pub const VARIANT_EXTENSION: &str = "webp";

/// Strip directories and the extension from a thumbnail reference.
///
/// Accepts both `/` and `\` separators, since references are stored as
/// plain strings by upstream tooling.
///
/// - `"foo/bar.jpg"` → `"bar"`
/// - `"/uploads/templates/bday.final.png"` → `"bday.final"`
/// - `"cover"` → `"cover"`
/// - `".hidden"` → `".hidden"`
pub fn base_filename(thumbnail_ref: &str) -> &str {
    let name = thumbnail_ref
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(thumbnail_ref);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

/// Filename of the variant for `base` at `width`: `{base}-{width}w.webp`.
pub fn variant_filename(base: &str, width: u32) -> String {
    format!("{}-{}w.{}", base, width, VARIANT_EXTENSION)
}

/// Whether a filename looks like a generated variant (`*-{digits}w.webp`).
pub fn is_variant_filename(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".webp") else {
        return false;
    };
    let Some(stem) = stem.strip_suffix('w') else {
        return false;
    };
    match stem.rfind('-') {
        Some(dash) => {
            let digits = &stem[dash + 1..];
            dash > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Resolve a web-path reference to a file under the document root.
///
/// Leading slashes are dropped so the reference never escapes to the
/// filesystem root.
pub fn resolve_source(document_root: &Path, thumbnail_ref: &str) -> PathBuf {
    let relative = thumbnail_ref.trim_start_matches(['/', '\\']);
    document_root.join(relative)
}
