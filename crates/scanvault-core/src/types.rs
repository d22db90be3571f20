// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the ScanVault engine.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a saved scan artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(pub Uuid);

impl ArtifactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two artifact kinds a scan can be persisted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactFormat {
    /// Single- or multi-page PDF document.
    Document,
    /// Plain JPEG image.
    Image,
}

impl ArtifactFormat {
    /// Canonical file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Document => "pdf",
            Self::Image => "jpg",
        }
    }

    /// MIME type used when registering the artifact with a public index.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Document => "application/pdf",
            Self::Image => "image/jpeg",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Document),
            "jpg" | "jpeg" => Some(Self::Image),
            _ => None,
        }
    }

    /// Which public collection exports of this format target.
    pub fn public_collection(&self) -> PublicCollection {
        match self {
            Self::Document => PublicCollection::Downloads,
            Self::Image => PublicCollection::Photos,
        }
    }
}

/// OS-managed public collections an artifact can be registered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicCollection {
    /// The shared photo index (gallery).
    Photos,
    /// The shared downloads collection.
    Downloads,
}

/// Storage permissions the engine may need to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    /// Broad write access to public storage, required on platforms that
    /// predate scoped-storage public APIs.
    LegacyWrite,
}

/// Outcome of a permission check or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Standard paper sizes for rendered documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    Letter,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::Letter => (216, 279),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// One row of the metadata index: a saved scan and its export state.
///
/// Records are immutable after creation except for `exported_path`, which is
/// set (or overwritten) whenever a public export succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub id: ArtifactId,
    /// Display name including extension. A rename produces a new export, not
    /// an in-place mutation of this field.
    pub file_name: String,
    pub format: ArtifactFormat,
    /// Absolute location of the app-owned copy.
    pub app_path: PathBuf,
    /// Public locator (`content://…` URI or filesystem path), present only
    /// after a successful export. The public copy may be deleted externally
    /// without invalidating the record.
    pub exported_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    pub fn new(
        file_name: String,
        format: ArtifactFormat,
        app_path: PathBuf,
        exported_path: Option<String>,
    ) -> Self {
        Self {
            id: ArtifactId::new(),
            file_name,
            format,
            app_path,
            exported_path,
            created_at: Utc::now(),
        }
    }
}
