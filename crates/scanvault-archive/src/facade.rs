// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orchestration facade — composes the index, save pipeline, export
// resolver, and merge engine into the user-facing flows.
//
// The index is the only shared mutable resource; it lives behind a
// single-owner `tokio::sync::Mutex`, so concurrent facade calls serialize
// naturally and two near-simultaneous mutations cannot lose an update.
// After every mutation the fresh record list is published on a watch
// channel for the UI layer.

use std::path::PathBuf;
use std::sync::Arc;

use scanvault_bridge::traits::PlatformBridge;
use scanvault_core::error::{Result, ScanVaultError};
use scanvault_core::human_errors::save_outcome_message;
use scanvault_core::types::{ArtifactFormat, ArtifactId, ArtifactRecord};
use scanvault_core::{DeletePolicy, VaultConfig};
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use crate::export::{ExportResolver, ExportStrategy};
use crate::index::ArtifactIndex;
use crate::merge::{MergeEngine, MergeSource};
use crate::names;
use crate::save::SavePipeline;
use crate::vault_dir;

/// Result of a completed save (or merge-as-save) flow.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// The record as appended to the index.
    pub record: ArtifactRecord,
}

impl SaveOutcome {
    /// Whether the public export succeeded.
    pub fn exported(&self) -> bool {
        self.record.exported_path.is_some()
    }

    /// User-facing summary line for this outcome.
    pub fn message(&self) -> String {
        save_outcome_message(self.record.format, self.exported())
    }
}

/// Result of a re-export (rename) flow.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Public locator, absent when the export soft-failed.
    pub exported_path: Option<String>,
}

/// The engine's front door: save, re-export, merge, and delete flows over a
/// consistent metadata index.
pub struct ScanArchive {
    index: Arc<Mutex<ArtifactIndex>>,
    pipeline: SavePipeline,
    resolver: ExportResolver,
    merger: MergeEngine,
    delete_policy: DeletePolicy,
    records_tx: watch::Sender<Vec<ArtifactRecord>>,
}

impl ScanArchive {
    /// Open an archive rooted at the given vault directory.
    pub fn open(
        vault_dir: impl Into<PathBuf>,
        bridge: Arc<dyn PlatformBridge>,
        config: VaultConfig,
    ) -> Self {
        let vault_dir = vault_dir.into();
        info!(
            path = %vault_dir.display(),
            platform = bridge.platform_name(),
            "opening scan archive"
        );

        let index = ArtifactIndex::open(vault_dir.join("index.json"), config.index_cap);
        let (records_tx, _) = watch::channel(index.list());

        Self {
            pipeline: SavePipeline::new(vault_dir.clone(), &config),
            merger: MergeEngine::new(vault_dir),
            resolver: ExportResolver::new(bridge),
            delete_policy: config.delete_policy,
            index: Arc::new(Mutex::new(index)),
            records_tx,
        }
    }

    /// Open an archive in the platform's default vault location.
    pub fn open_default(bridge: Arc<dyn PlatformBridge>, config: VaultConfig) -> Self {
        Self::open(vault_dir::vault_dir(), bridge, config)
    }

    /// The export strategy the archive runs under.
    pub fn export_strategy(&self) -> ExportStrategy {
        self.resolver.strategy()
    }

    /// Save a captured image, export it best-effort, and record it.
    ///
    /// A save-stage failure aborts before any index mutation. An export
    /// failure after a successful save still appends the record — the
    /// app-local copy is never lost.
    pub async fn save_scan(
        &self,
        source_locator: &str,
        base_name: &str,
        format: ArtifactFormat,
    ) -> Result<SaveOutcome> {
        let saved = self.pipeline.save(source_locator, base_name, format)?;
        let display = names::display_name(&saved.base_name, format);

        let exported = match self.resolver.export(&saved.app_path, format, &display) {
            Ok(locator) => locator,
            Err(err) => {
                // The app-local copy is already safe; export stays
                // best-effort.
                warn!(%err, "export failed after save");
                None
            }
        };

        let record = ArtifactRecord::new(display, format, saved.app_path, exported);
        {
            let index = self.index.lock().await;
            index.append(&record)?;
            self.publish(&index);
        }

        Ok(SaveOutcome { record })
    }

    /// Re-run the export for an existing record, optionally under a new
    /// display name.
    ///
    /// The stored record's `file_name` and `app_path` are never touched; a
    /// successful export only patches `exported_path`. A rename therefore
    /// produces a second public copy rather than renaming the first.
    pub async fn re_export(
        &self,
        id: ArtifactId,
        new_base_name: Option<&str>,
    ) -> Result<ExportOutcome> {
        let record = {
            let index = self.index.lock().await;
            index.list().into_iter().find(|r| r.id == id)
        }
        .ok_or_else(|| ScanVaultError::NotFound(format!("record {id}")))?;

        let stored_base = names::strip_known_extension(&record.file_name);
        let base = {
            let requested = new_base_name
                .map(names::sanitize_base_name)
                .unwrap_or_default();
            if requested.is_empty() {
                names::sanitize_or_fallback(stored_base, "scan")
            } else {
                requested
            }
        };
        let display = names::display_name(&base, record.format);

        let exported = self
            .resolver
            .export(&record.app_path, record.format, &display)?;

        if let Some(locator) = &exported {
            let index = self.index.lock().await;
            index.patch_exported_path(id, locator)?;
            self.publish(&index);
        }

        Ok(ExportOutcome {
            exported_path: exported,
        })
    }

    /// Merge existing document records into a new artifact and treat it as
    /// a fresh save: export best-effort, then append a new record. Source
    /// records are not altered.
    pub async fn merge_documents(
        &self,
        ids: &[ArtifactId],
        output_base: &str,
    ) -> Result<SaveOutcome> {
        let records = { self.index.lock().await.list() };
        let mut sources = Vec::with_capacity(ids.len());
        for id in ids {
            let record = records
                .iter()
                .find(|r| r.id == *id)
                .ok_or_else(|| ScanVaultError::NotFound(format!("record {id}")))?;
            sources.push(MergeSource::from(record));
        }

        let merged = self.merger.merge(&sources, output_base)?;
        let display = names::display_name(&merged.base_name, ArtifactFormat::Document);

        let exported = match self
            .resolver
            .export(&merged.app_path, ArtifactFormat::Document, &display)
        {
            Ok(locator) => locator,
            Err(err) => {
                warn!(%err, "export failed after merge");
                None
            }
        };

        let record =
            ArtifactRecord::new(display, ArtifactFormat::Document, merged.app_path, exported);
        {
            let index = self.index.lock().await;
            index.append(&record)?;
            self.publish(&index);
        }

        Ok(SaveOutcome { record })
    }

    /// Remove a record from the index. Under `DeletePolicy::RemoveFile` the
    /// app-private file is deleted too, best-effort. Deleting an absent id
    /// is a no-op.
    pub async fn delete(&self, id: ArtifactId) -> Result<()> {
        let index = self.index.lock().await;

        if self.delete_policy == DeletePolicy::RemoveFile {
            if let Some(record) = index.list().into_iter().find(|r| r.id == id) {
                // A missing file must not block record removal.
                if let Err(err) = std::fs::remove_file(&record.app_path) {
                    warn!(%err, path = %record.app_path.display(), "could not delete artifact file");
                }
            }
        }

        index.remove(id)?;
        self.publish(&index);
        Ok(())
    }

    /// Snapshot of all records, newest first.
    pub async fn records(&self) -> Vec<ArtifactRecord> {
        self.index.lock().await.list()
    }

    /// Reactive view of the record list; receives a fresh snapshot after
    /// every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ArtifactRecord>> {
        self.records_tx.subscribe()
    }

    fn publish(&self, index: &ArtifactIndex) {
        self.records_tx.send_replace(index.list());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FakeBridge};
    use scanvault_core::types::PermissionStatus;

    fn archive_with(bridge: FakeBridge, dir: &tempfile::TempDir) -> ScanArchive {
        ScanArchive::open(
            dir.path().join("vault"),
            Arc::new(bridge),
            VaultConfig::default(),
        )
    }

    fn capture_fixture(dir: &tempfile::TempDir, name: &str) -> String {
        let path = dir.path().join(format!("{name}.png"));
        testing::write_png_fixture(&path, 40, 60);
        path.to_str().expect("utf8").to_string()
    }

    #[tokio::test]
    async fn save_flow_records_and_exports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);
        let capture = capture_fixture(&dir, "capture");

        let outcome = archive
            .save_scan(&capture, "My Receipt", ArtifactFormat::Document)
            .await
            .expect("save flow");

        assert!(outcome.exported());
        assert!(outcome.record.app_path.exists());
        assert_eq!(outcome.record.file_name, "My_Receipt.pdf");
        assert!(outcome.message().contains("Downloads"));

        let records = archive.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, outcome.record.id);
    }

    #[tokio::test]
    async fn export_failure_still_appends_the_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(
            FakeBridge::scoped(dir.path().join("public")).failing(),
            &dir,
        );
        let capture = capture_fixture(&dir, "capture");

        let outcome = archive
            .save_scan(&capture, "doc", ArtifactFormat::Document)
            .await
            .expect("save flow must not fail on export");

        assert!(!outcome.exported());
        assert!(outcome.record.app_path.exists());

        let records = archive.records().await;
        assert_eq!(records.len(), 1);
        assert!(records[0].exported_path.is_none());
    }

    #[tokio::test]
    async fn permission_denial_keeps_artifact_and_record_intact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(
            FakeBridge::legacy(dir.path().join("public"), PermissionStatus::Denied),
            &dir,
        );
        let capture = capture_fixture(&dir, "capture");

        let outcome = archive
            .save_scan(&capture, "doc", ArtifactFormat::Document)
            .await
            .expect("save flow");

        assert!(!outcome.exported());
        assert!(outcome.record.app_path.exists());
        assert_eq!(archive.records().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_save_mutates_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);

        let err = archive
            .save_scan("/nowhere/gone.png", "doc", ArtifactFormat::Document)
            .await
            .expect_err("save must fail");
        assert!(matches!(err, ScanVaultError::SaveFailed { .. }));
        assert!(archive.records().await.is_empty());
    }

    #[tokio::test]
    async fn re_export_patches_locator_but_not_the_record_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);
        let capture = capture_fixture(&dir, "capture");

        let saved = archive
            .save_scan(&capture, "original", ArtifactFormat::Document)
            .await
            .expect("save flow");

        let outcome = archive
            .re_export(saved.record.id, Some("renamed copy"))
            .await
            .expect("re-export");

        let locator = outcome.exported_path.expect("exported");
        assert!(locator.contains("renamed_copy.pdf"));
        assert!(dir.path().join("public").join("renamed_copy.pdf").exists());

        // The stored record keeps its original name and path; only the
        // export locator moved.
        let records = archive.records().await;
        assert_eq!(records[0].file_name, "original.pdf");
        assert_eq!(records[0].app_path, saved.record.app_path);
        assert_eq!(records[0].exported_path.as_deref(), Some(locator.as_str()));
    }

    #[tokio::test]
    async fn re_export_of_unknown_record_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);

        let err = archive
            .re_export(ArtifactId::new(), None)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ScanVaultError::NotFound(_)));
    }

    #[tokio::test]
    async fn re_export_of_vanished_artifact_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);
        let capture = capture_fixture(&dir, "capture");

        let saved = archive
            .save_scan(&capture, "doc", ArtifactFormat::Document)
            .await
            .expect("save flow");
        std::fs::remove_file(&saved.record.app_path).expect("delete artifact");

        let err = archive
            .re_export(saved.record.id, None)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ScanVaultError::NotFound(_)));
    }

    #[tokio::test]
    async fn merge_flow_appends_a_new_record_and_keeps_sources() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);

        let a = archive
            .save_scan(&capture_fixture(&dir, "a"), "a", ArtifactFormat::Document)
            .await
            .expect("save a");
        let b = archive
            .save_scan(&capture_fixture(&dir, "b"), "b", ArtifactFormat::Document)
            .await
            .expect("save b");

        let merged = archive
            .merge_documents(&[a.record.id, b.record.id], "combined")
            .await
            .expect("merge flow");

        assert_eq!(merged.record.file_name, "combined.pdf");
        assert_eq!(
            scanvault_document::page_count(&merged.record.app_path).expect("page count"),
            2
        );

        let records = archive.records().await;
        assert_eq!(records.len(), 3);
        assert!(a.record.app_path.exists());
        assert!(b.record.app_path.exists());
    }

    #[tokio::test]
    async fn merge_precondition_failure_appends_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);

        let a = archive
            .save_scan(&capture_fixture(&dir, "a"), "a", ArtifactFormat::Document)
            .await
            .expect("save a");

        let err = archive
            .merge_documents(&[a.record.id], "combined")
            .await
            .expect_err("must fail");
        assert!(matches!(err, ScanVaultError::MergePrecondition(_)));
        assert_eq!(archive.records().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_is_index_only_by_default_and_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);
        let capture = capture_fixture(&dir, "capture");

        let saved = archive
            .save_scan(&capture, "doc", ArtifactFormat::Document)
            .await
            .expect("save flow");

        archive.delete(saved.record.id).await.expect("delete");
        assert!(archive.records().await.is_empty());
        // Default policy keeps the underlying file.
        assert!(saved.record.app_path.exists());

        archive.delete(saved.record.id).await.expect("second delete");
        assert!(archive.records().await.is_empty());
    }

    #[tokio::test]
    async fn remove_file_policy_deletes_the_artifact_too() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = VaultConfig {
            delete_policy: DeletePolicy::RemoveFile,
            ..VaultConfig::default()
        };
        let archive = ScanArchive::open(
            dir.path().join("vault"),
            Arc::new(FakeBridge::scoped(dir.path().join("public"))),
            config,
        );
        let capture = capture_fixture(&dir, "capture");

        let saved = archive
            .save_scan(&capture, "doc", ArtifactFormat::Document)
            .await
            .expect("save flow");

        archive.delete(saved.record.id).await.expect("delete");
        assert!(archive.records().await.is_empty());
        assert!(!saved.record.app_path.exists());
    }

    #[tokio::test]
    async fn subscribers_see_every_mutation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive = archive_with(FakeBridge::scoped(dir.path().join("public")), &dir);
        let rx = archive.subscribe();
        assert!(rx.borrow().is_empty());

        let saved = archive
            .save_scan(
                &capture_fixture(&dir, "capture"),
                "doc",
                ArtifactFormat::Document,
            )
            .await
            .expect("save flow");
        assert_eq!(rx.borrow().len(), 1);

        archive.delete(saved.record.id).await.expect("delete");
        assert!(rx.borrow().is_empty());
    }
}
