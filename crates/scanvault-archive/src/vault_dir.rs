// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware vault directory resolution.

use std::path::PathBuf;

/// Return the default app-private vault directory, creating it if needed.
///
/// On desktop this uses a conventional location. On mobile the platform
/// bridge should provide the app documents directory instead, passed
/// explicitly to [`crate::ScanArchive::open`].
pub fn vault_dir() -> PathBuf {
    let dir = dirs_fallback().join("scanvault").join("scans");
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn dirs_fallback() -> PathBuf {
    // Try XDG data dir, then fall back to home
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    PathBuf::from("/tmp")
}
