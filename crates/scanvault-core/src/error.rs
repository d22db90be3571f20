// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for ScanVault.

use thiserror::Error;

/// The save pipeline stage at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStage {
    /// Creating the app-private vault directory.
    PrepareFolder,
    /// Copying the captured image into the vault.
    CopyImage,
    /// Reading the captured image bytes for rendering.
    ReadSource,
    /// Rendering the single-page PDF.
    RenderDocument,
    /// Writing the rendered PDF into the vault.
    WriteDocument,
}

impl std::fmt::Display for SaveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PrepareFolder => "prepare-folder",
            Self::CopyImage => "copy-image",
            Self::ReadSource => "read-source",
            Self::RenderDocument => "render-document",
            Self::WriteDocument => "write-document",
        };
        f.write_str(name)
    }
}

/// Top-level error type for all ScanVault operations.
#[derive(Debug, Error)]
pub enum ScanVaultError {
    // -- Save pipeline --
    #[error("save failed at {stage}: {message}")]
    SaveFailed { stage: SaveStage, message: String },

    // -- Merge engine --
    #[error("merge rejected: {0}")]
    MergePrecondition(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Lookup --
    #[error("not found: {0}")]
    NotFound(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl ScanVaultError {
    /// Shorthand for a staged save failure.
    pub fn save(stage: SaveStage, message: impl Into<String>) -> Self {
        Self::SaveFailed {
            stage,
            message: message.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanVaultError>;
