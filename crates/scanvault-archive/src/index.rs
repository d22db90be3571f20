// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capped, newest-first metadata index persisted as a single JSON blob.
//
// Every mutation reads the full list, applies the change, and atomically
// rewrites the blob (temp file + rename), so readers never observe a torn
// list. The cap keeps the blob small enough that whole-file rewrites stay
// cheap.
//
// All methods are synchronous filesystem I/O. In an async context the
// facade serializes access behind a single-owner mutex.

use std::path::PathBuf;

use scanvault_core::error::Result;
use scanvault_core::types::{ArtifactId, ArtifactRecord};
use tracing::{debug, info, instrument, warn};

/// Durable record list for saved scans.
pub struct ArtifactIndex {
    /// Location of the JSON blob.
    path: PathBuf,
    /// Maximum number of records retained; oldest beyond the cap are dropped
    /// on insert.
    cap: usize,
}

impl ArtifactIndex {
    /// Open an index stored at the given blob path.
    ///
    /// No I/O happens until the first call; an index file that does not
    /// exist yet behaves as an empty list.
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Self {
        let path = path.into();
        debug!(path = %path.display(), cap, "artifact index opened");
        Self { path, cap }
    }

    /// All records, newest first.
    ///
    /// Never fails: an absent, unreadable, or unparsable blob degrades to
    /// the empty list. The next successful mutation rewrites a clean blob.
    pub fn list(&self) -> Vec<ArtifactRecord> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(%err, path = %self.path.display(), "index blob unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(%err, path = %self.path.display(), "index blob corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Insert a record at the head and truncate to the cap.
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub fn append(&self, record: &ArtifactRecord) -> Result<()> {
        let mut records = self.list();
        records.insert(0, record.clone());
        records.truncate(self.cap);
        self.persist(&records)?;

        info!(id = %record.id, file_name = %record.file_name, "record appended");
        Ok(())
    }

    /// Remove the record with the given id. Removing an absent id is a
    /// no-op, not an error.
    #[instrument(skip(self))]
    pub fn remove(&self, id: ArtifactId) -> Result<()> {
        let records = self.list();
        let before = records.len();
        let remaining: Vec<ArtifactRecord> =
            records.into_iter().filter(|r| r.id != id).collect();

        if remaining.len() == before {
            debug!(%id, "remove: id not present, nothing to do");
            return Ok(());
        }

        self.persist(&remaining)?;
        info!(%id, "record removed");
        Ok(())
    }

    /// Set `exported_path` on exactly the record with the given id. An
    /// absent id is a no-op.
    #[instrument(skip(self, locator))]
    pub fn patch_exported_path(&self, id: ArtifactId, locator: &str) -> Result<()> {
        let mut records = self.list();
        let mut patched = false;

        for record in &mut records {
            if record.id == id {
                record.exported_path = Some(locator.to_string());
                patched = true;
                break;
            }
        }

        if !patched {
            debug!(%id, "patch: id not present, nothing to do");
            return Ok(());
        }

        self.persist(&records)?;
        debug!(%id, "exported path patched");
        Ok(())
    }

    /// Atomically rewrite the blob: write a sibling temp file, then rename
    /// it over the index.
    fn persist(&self, records: &[ArtifactRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let bytes = serde_json::to_vec(records)?;
        let tmp = self.path.with_extension("json.tmp");
        if let Err(err) = std::fs::write(&tmp, &bytes) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err.into());
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
