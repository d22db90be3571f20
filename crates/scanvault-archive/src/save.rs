// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Save pipeline — turn a captured image into an app-owned artifact.
//
// Image saves copy the capture into the vault directory; document saves
// render it onto a single PDF page first. Either way a prior artifact with
// the same sanitized name is replaced, and a failed save leaves no partial
// file behind.

use std::path::{Path, PathBuf};

use scanvault_core::error::{Result, SaveStage, ScanVaultError};
use scanvault_core::{ArtifactFormat, VaultConfig};
use scanvault_document::PdfRenderer;
use tracing::{info, instrument};

use crate::names;

/// A freshly created app-owned artifact.
#[derive(Debug, Clone)]
pub struct SavedArtifact {
    /// Absolute path inside the vault directory.
    pub app_path: PathBuf,
    /// The sanitized base name actually used (extension-less).
    pub base_name: String,
}

/// Persists captured scans into the app-private vault directory.
pub struct SavePipeline {
    vault_dir: PathBuf,
    renderer: PdfRenderer,
}

impl SavePipeline {
    pub fn new(vault_dir: impl Into<PathBuf>, config: &VaultConfig) -> Self {
        Self {
            vault_dir: vault_dir.into(),
            renderer: PdfRenderer::new(config.paper_size, config.page_margin_mm),
        }
    }

    /// Save a captured image under the requested name and format.
    ///
    /// The source locator may carry a `file://` scheme; it is normalized
    /// before use. Any I/O or render failure surfaces as
    /// [`ScanVaultError::SaveFailed`] with the failing stage named.
    #[instrument(skip_all, fields(base_name, format = ?format))]
    pub fn save(
        &self,
        source_locator: &str,
        base_name: &str,
        format: ArtifactFormat,
    ) -> Result<SavedArtifact> {
        std::fs::create_dir_all(&self.vault_dir)
            .map_err(|e| ScanVaultError::save(SaveStage::PrepareFolder, e.to_string()))?;

        let source = names::normalize_locator(source_locator);
        let base = names::sanitize_or_fallback(base_name, "scan");
        let destination = self.vault_dir.join(names::display_name(&base, format));

        match format {
            ArtifactFormat::Image => self.copy_image(&source, &destination)?,
            ArtifactFormat::Document => self.render_document(&source, &destination)?,
        }

        info!(path = %destination.display(), "scan saved");
        Ok(SavedArtifact {
            app_path: destination,
            base_name: base,
        })
    }

    /// Copy the capture as-is, replacing any same-named prior artifact.
    fn copy_image(&self, source: &Path, destination: &Path) -> Result<()> {
        if destination.exists() {
            std::fs::remove_file(destination)
                .map_err(|e| ScanVaultError::save(SaveStage::CopyImage, e.to_string()))?;
        }
        if let Err(err) = std::fs::copy(source, destination) {
            // A failed copy must not leave a partial artifact behind.
            let _ = std::fs::remove_file(destination);
            return Err(ScanVaultError::save(SaveStage::CopyImage, err.to_string()));
        }
        Ok(())
    }

    /// Render the capture onto a single PDF page and move it into place.
    fn render_document(&self, source: &Path, destination: &Path) -> Result<()> {
        let image_bytes = std::fs::read(source)
            .map_err(|e| ScanVaultError::save(SaveStage::ReadSource, e.to_string()))?;

        let pdf = self
            .renderer
            .render_image_page(&image_bytes)
            .map_err(|e| ScanVaultError::save(SaveStage::RenderDocument, e.to_string()))?;

        write_replacing(destination, &pdf)
            .map_err(|e| ScanVaultError::save(SaveStage::WriteDocument, e.to_string()))
    }
}

/// Write bytes via a sibling temp file, then rename into place, replacing
/// any prior file. A failed write leaves no partial destination behind.
pub(crate) fn write_replacing(destination: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = destination.with_extension("part");
    if let Err(err) = std::fs::write(&tmp, bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err);
    }
    std::fs::rename(&tmp, destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn pipeline_in(dir: &tempfile::TempDir) -> SavePipeline {
        SavePipeline::new(dir.path().join("vault"), &VaultConfig::default())
    }

    #[test]
    fn image_save_copies_into_the_vault() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("capture.png");
        testing::write_png_fixture(&source, 40, 30);

        let saved = pipeline_in(&dir)
            .save(source.to_str().expect("utf8"), "My Receipt", ArtifactFormat::Image)
            .expect("save failed");

        assert!(saved.app_path.exists());
        assert_eq!(saved.base_name, "My_Receipt");
        assert!(saved.app_path.ends_with("My_Receipt.jpg"));
    }

    #[test]
    fn file_scheme_locators_are_accepted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("capture.png");
        testing::write_png_fixture(&source, 40, 30);
        let locator = format!("file://{}", source.display());

        let saved = pipeline_in(&dir)
            .save(&locator, "scheme", ArtifactFormat::Image)
            .expect("save failed");
        assert!(saved.app_path.exists());
    }

    #[test]
    fn same_name_save_replaces_the_prior_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let small = dir.path().join("small.png");
        let large = dir.path().join("large.png");
        testing::write_png_fixture(&small, 10, 10);
        testing::write_png_fixture(&large, 80, 80);
        let pipeline = pipeline_in(&dir);

        let first = pipeline
            .save(small.to_str().expect("utf8"), "doc", ArtifactFormat::Image)
            .expect("first save");
        let second = pipeline
            .save(large.to_str().expect("utf8"), "doc", ArtifactFormat::Image)
            .expect("second save");

        assert_eq!(first.app_path, second.app_path);
        let written = std::fs::read(&second.app_path).expect("read artifact");
        let original = std::fs::read(&large).expect("read source");
        assert_eq!(written, original);
    }

    #[test]
    fn document_save_renders_a_one_page_pdf() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("capture.png");
        testing::write_png_fixture(&source, 60, 90);

        let saved = pipeline_in(&dir)
            .save(source.to_str().expect("utf8"), "contract", ArtifactFormat::Document)
            .expect("save failed");

        assert!(saved.app_path.ends_with("contract.pdf"));
        assert_eq!(
            scanvault_document::page_count(&saved.app_path).expect("page count"),
            1
        );
    }

    #[test]
    fn missing_source_fails_at_the_named_stage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pipeline = pipeline_in(&dir);

        let err = pipeline
            .save("/nowhere/gone.png", "doc", ArtifactFormat::Document)
            .expect_err("must fail");
        assert!(matches!(
            err,
            ScanVaultError::SaveFailed {
                stage: SaveStage::ReadSource,
                ..
            }
        ));

        let err = pipeline
            .save("/nowhere/gone.png", "img", ArtifactFormat::Image)
            .expect_err("must fail");
        assert!(matches!(
            err,
            ScanVaultError::SaveFailed {
                stage: SaveStage::CopyImage,
                ..
            }
        ));
    }

    #[test]
    fn failed_document_save_leaves_no_partial_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let garbage = dir.path().join("garbage.bin");
        std::fs::write(&garbage, b"not an image").expect("write garbage");
        let pipeline = pipeline_in(&dir);

        let err = pipeline
            .save(garbage.to_str().expect("utf8"), "broken", ArtifactFormat::Document)
            .expect_err("must fail");
        assert!(matches!(
            err,
            ScanVaultError::SaveFailed {
                stage: SaveStage::RenderDocument,
                ..
            }
        ));
        assert!(!dir.path().join("vault").join("broken.pdf").exists());
        assert!(!dir.path().join("vault").join("broken.part").exists());
    }

    #[test]
    fn unusable_name_falls_back_to_a_timestamp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("capture.png");
        testing::write_png_fixture(&source, 40, 30);

        let saved = pipeline_in(&dir)
            .save(source.to_str().expect("utf8"), ":::///", ArtifactFormat::Image)
            .expect("save failed");
        assert!(saved.base_name.starts_with("scan_"));
        assert!(saved.app_path.exists());
    }
}
