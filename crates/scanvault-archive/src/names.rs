// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File-name sanitization and locator normalization.

use std::path::PathBuf;

use chrono::Utc;
use scanvault_core::ArtifactFormat;

/// Upper bound on a sanitized base name, in bytes.
pub const MAX_BASE_NAME_LEN: usize = 60;

/// Sanitize a user-supplied base name into something safe for a file name.
///
/// Trims surrounding whitespace, collapses internal whitespace runs to a
/// single `_`, strips everything outside `[A-Za-z0-9_-]`, and truncates to
/// [`MAX_BASE_NAME_LEN`]. Idempotent: sanitizing a sanitized name is a
/// no-op. May return an empty string — see [`sanitize_or_fallback`].
pub fn sanitize_base_name(raw: &str) -> String {
    let collapsed = raw.trim().split_whitespace().collect::<Vec<_>>().join("_");
    collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(MAX_BASE_NAME_LEN)
        .collect()
}

/// Sanitize, falling back to `<prefix>_<UTC timestamp>` when sanitization
/// yields nothing usable.
pub fn sanitize_or_fallback(raw: &str, prefix: &str) -> String {
    let sanitized = sanitize_base_name(raw);
    if sanitized.is_empty() {
        format!("{prefix}_{}", Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        sanitized
    }
}

/// Strip a known artifact extension (`.pdf`, `.jpg`, `.jpeg`) from a display
/// name, if present.
pub fn strip_known_extension(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for ext in [".pdf", ".jpg", ".jpeg"] {
        if lower.ends_with(ext) {
            return &name[..name.len() - ext.len()];
        }
    }
    name
}

/// Display name for a base name and format, e.g. `receipt` + Document →
/// `receipt.pdf`.
pub fn display_name(base: &str, format: ArtifactFormat) -> String {
    format!("{base}.{}", format.extension())
}

/// Normalize a capture locator to a filesystem path.
///
/// Capture collaborators hand back `file://` URIs; everything downstream
/// works on plain paths.
pub fn normalize_locator(locator: &str) -> PathBuf {
    PathBuf::from(locator.strip_prefix("file://").unwrap_or(locator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_is_idempotent() {
        for raw in [
            "My Receipt  2026",
            "  spaced   out  ",
            "safe_name-already",
            "weird/:*?\"<>|chars",
            "résumé scan",
            "",
        ] {
            let once = sanitize_base_name(raw);
            assert_eq!(sanitize_base_name(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn whitespace_collapses_to_underscores() {
        assert_eq!(sanitize_base_name("My  Receipt 2026"), "My_Receipt_2026");
    }

    #[test]
    fn illegal_characters_are_stripped() {
        assert_eq!(sanitize_base_name("tax/return: *2026*"), "taxreturn_2026");
    }

    #[test]
    fn all_illegal_input_falls_back_to_timestamp_name() {
        let name = sanitize_or_fallback("///:::***", "scan");
        assert!(name.starts_with("scan_"));
        assert!(name.len() > "scan_".len());
        // The fallback itself survives sanitization untouched.
        assert_eq!(sanitize_base_name(&name), name);
    }

    #[test]
    fn long_names_are_truncated() {
        let raw = "x".repeat(200);
        assert_eq!(sanitize_base_name(&raw).len(), MAX_BASE_NAME_LEN);
    }

    #[test]
    fn known_extensions_are_stripped_case_insensitively() {
        assert_eq!(strip_known_extension("doc.pdf"), "doc");
        assert_eq!(strip_known_extension("photo.JPEG"), "photo");
        assert_eq!(strip_known_extension("archive.tar"), "archive.tar");
    }

    #[test]
    fn display_names_carry_the_format_extension() {
        assert_eq!(display_name("doc", ArtifactFormat::Document), "doc.pdf");
        assert_eq!(display_name("photo", ArtifactFormat::Image), "photo.jpg");
    }

    #[test]
    fn file_scheme_is_stripped() {
        assert_eq!(
            normalize_locator("file:///data/capture/img.png"),
            PathBuf::from("/data/capture/img.png")
        );
        assert_eq!(
            normalize_locator("/already/plain.png"),
            PathBuf::from("/already/plain.png")
        );
    }
}
