// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge engine — combine existing document artifacts into one new
// multi-page document in the vault directory.

use std::path::PathBuf;

use scanvault_core::error::{Result, ScanVaultError};
use scanvault_core::types::{ArtifactFormat, ArtifactRecord};
use tracing::{info, instrument};

use crate::names;
use crate::save::write_replacing;

/// One merge input, carried with enough context to name it in errors.
#[derive(Debug, Clone)]
pub struct MergeSource {
    pub app_path: PathBuf,
    pub format: ArtifactFormat,
    pub display_name: String,
}

impl From<&ArtifactRecord> for MergeSource {
    fn from(record: &ArtifactRecord) -> Self {
        Self {
            app_path: record.app_path.clone(),
            format: record.format,
            display_name: record.file_name.clone(),
        }
    }
}

/// A freshly merged document artifact.
#[derive(Debug, Clone)]
pub struct MergedDocument {
    pub app_path: PathBuf,
    pub base_name: String,
}

/// Concatenates document artifacts page-preservingly.
pub struct MergeEngine {
    vault_dir: PathBuf,
}

impl MergeEngine {
    pub fn new(vault_dir: impl Into<PathBuf>) -> Self {
        Self {
            vault_dir: vault_dir.into(),
        }
    }

    /// Merge the given documents, in order, into `<output_base>.pdf` inside
    /// the vault directory, replacing any prior file of that name.
    ///
    /// Precondition violations are hard failures and nothing is written:
    /// fewer than two sources or a non-document source is
    /// [`ScanVaultError::MergePrecondition`]; a source whose file is gone is
    /// [`ScanVaultError::NotFound`], naming the offender.
    #[instrument(skip_all, fields(source_count = sources.len(), output_base))]
    pub fn merge(&self, sources: &[MergeSource], output_base: &str) -> Result<MergedDocument> {
        if sources.len() < 2 {
            return Err(ScanVaultError::MergePrecondition(
                "at least two documents are required".into(),
            ));
        }
        for source in sources {
            if source.format != ArtifactFormat::Document {
                return Err(ScanVaultError::MergePrecondition(format!(
                    "{} is not a document",
                    source.display_name
                )));
            }
            if !source.app_path.exists() {
                return Err(ScanVaultError::NotFound(source.display_name.clone()));
            }
        }

        std::fs::create_dir_all(&self.vault_dir)?;

        let base = names::sanitize_or_fallback(output_base, "merge");
        let destination = self
            .vault_dir
            .join(names::display_name(&base, ArtifactFormat::Document));

        let paths: Vec<&std::path::Path> =
            sources.iter().map(|s| s.app_path.as_path()).collect();
        let bytes = scanvault_document::merge_files(&paths)?;
        write_replacing(&destination, &bytes)?;

        info!(path = %destination.display(), "documents merged");
        Ok(MergedDocument {
            app_path: destination,
            base_name: base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::SavePipeline;
    use crate::testing;
    use scanvault_core::VaultConfig;

    fn document_source(dir: &tempfile::TempDir, name: &str) -> MergeSource {
        let capture = dir.path().join(format!("{name}.png"));
        testing::write_png_fixture(&capture, 30, 40);
        let saved = SavePipeline::new(dir.path().join("vault"), &VaultConfig::default())
            .save(capture.to_str().expect("utf8"), name, ArtifactFormat::Document)
            .expect("save fixture document");
        MergeSource {
            app_path: saved.app_path,
            format: ArtifactFormat::Document,
            display_name: format!("{name}.pdf"),
        }
    }

    #[test]
    fn merges_documents_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = document_source(&dir, "a");
        let b = document_source(&dir, "b");
        let engine = MergeEngine::new(dir.path().join("vault"));

        let merged = engine.merge(&[a, b], "combined").expect("merge failed");

        assert!(merged.app_path.ends_with("combined.pdf"));
        assert_eq!(
            scanvault_document::page_count(&merged.app_path).expect("page count"),
            2
        );
    }

    #[test]
    fn single_input_is_rejected_and_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = document_source(&dir, "solo");
        let engine = MergeEngine::new(dir.path().join("vault"));

        let err = engine.merge(&[a], "combined").expect_err("must fail");
        assert!(matches!(err, ScanVaultError::MergePrecondition(_)));
        assert!(!dir.path().join("vault").join("combined.pdf").exists());
    }

    #[test]
    fn non_document_input_is_rejected_by_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = document_source(&dir, "a");
        let mut image = document_source(&dir, "photo");
        image.format = ArtifactFormat::Image;
        image.display_name = "photo.jpg".into();
        let engine = MergeEngine::new(dir.path().join("vault"));

        let err = engine.merge(&[a, image], "combined").expect_err("must fail");
        match err {
            ScanVaultError::MergePrecondition(detail) => {
                assert!(detail.contains("photo.jpg"));
            }
            other => panic!("expected MergePrecondition, got {other:?}"),
        }
        assert!(!dir.path().join("vault").join("combined.pdf").exists());
    }

    #[test]
    fn vanished_input_is_not_found_by_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = document_source(&dir, "a");
        let b = document_source(&dir, "b");
        std::fs::remove_file(&b.app_path).expect("delete b");
        let engine = MergeEngine::new(dir.path().join("vault"));

        let err = engine.merge(&[a, b], "combined").expect_err("must fail");
        match err {
            ScanVaultError::NotFound(name) => assert_eq!(name, "b.pdf"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn empty_output_name_falls_back_to_timestamp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = document_source(&dir, "a");
        let b = document_source(&dir, "b");
        let engine = MergeEngine::new(dir.path().join("vault"));

        let merged = engine.merge(&[a, b], "   ").expect("merge failed");
        assert!(merged.base_name.starts_with("merge_"));
        assert!(merged.app_path.exists());
    }
}
