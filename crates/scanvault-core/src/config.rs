// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use serde::{Deserialize, Serialize};

use crate::types::PaperSize;

/// What `delete` does beyond removing the index record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletePolicy {
    /// Remove the record only; the app-private file is left in place.
    IndexOnly,
    /// Also delete the underlying app-private file (best effort).
    RemoveFile,
}

/// Persistent engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Page size for rendered documents.
    pub paper_size: PaperSize,
    /// Margin around the placed image on a rendered page, in millimetres.
    pub page_margin_mm: f32,
    /// Maximum number of records kept in the metadata index. Inserting
    /// beyond the cap drops the oldest records.
    pub index_cap: usize,
    /// Album / folder label used when registering artifacts with the public
    /// index.
    pub public_folder: String,
    /// Whether deleting a record also deletes the app-private file.
    pub delete_policy: DeletePolicy,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            page_margin_mm: 8.0,
            index_cap: 50,
            public_folder: "ScanVault".into(),
            delete_policy: DeletePolicy::IndexOnly,
        }
    }
}
