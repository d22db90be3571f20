// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test-only helpers shared across the crate's test modules.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use scanvault_bridge::traits::{
    NativeCapture, NativeMediaStore, NativePermissions, PlatformBridge, StorageCapabilities,
};
use scanvault_core::error::{Result, ScanVaultError};
use scanvault_core::types::{PermissionKind, PermissionStatus, PublicCollection};

/// Write a small solid-colour PNG usable as a capture fixture.
pub(crate) fn write_png_fixture(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("fixture parent dir");
    }
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([180u8, 180, 180]));
    image::DynamicImage::ImageRgb8(img)
        .save_with_format(path, image::ImageFormat::Png)
        .expect("write png fixture");
}

/// In-memory platform bridge backed by a plain directory standing in for
/// public storage.
pub(crate) struct FakeBridge {
    scoped: bool,
    permission: PermissionStatus,
    public_dir: PathBuf,
    fail_copy: bool,
    checks: AtomicUsize,
    last_collection: Mutex<Option<PublicCollection>>,
}

impl FakeBridge {
    /// Bridge advertising scoped public-storage APIs.
    pub(crate) fn scoped(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            scoped: true,
            permission: PermissionStatus::Granted,
            public_dir: public_dir.into(),
            fail_copy: false,
            checks: AtomicUsize::new(0),
            last_collection: Mutex::new(None),
        }
    }

    /// Bridge for a pre-scoped platform with the given permission answer.
    pub(crate) fn legacy(public_dir: impl Into<PathBuf>, permission: PermissionStatus) -> Self {
        Self {
            scoped: false,
            permission,
            public_dir: public_dir.into(),
            fail_copy: false,
            checks: AtomicUsize::new(0),
            last_collection: Mutex::new(None),
        }
    }

    /// Make every public copy fail (disk full, media store offline).
    pub(crate) fn failing(mut self) -> Self {
        self.fail_copy = true;
        self
    }

    /// How many times the permission layer was consulted.
    pub(crate) fn permission_checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    /// The collection the last public-index copy targeted.
    pub(crate) fn last_collection(&self) -> Option<PublicCollection> {
        *self.last_collection.lock().expect("collection lock")
    }

    fn copy_public(&self, source: &Path, display_name: &str) -> Result<PathBuf> {
        if self.fail_copy {
            return Err(ScanVaultError::Bridge("media store offline".into()));
        }
        std::fs::create_dir_all(&self.public_dir)?;
        let destination = self.public_dir.join(display_name);
        if destination.exists() {
            std::fs::remove_file(&destination)?;
        }
        std::fs::copy(source, &destination)?;
        Ok(destination)
    }
}

impl PlatformBridge for FakeBridge {
    fn platform_name(&self) -> &str {
        "Test"
    }

    fn storage_capabilities(&self) -> StorageCapabilities {
        StorageCapabilities {
            scoped_public_index: self.scoped,
        }
    }
}

impl NativeCapture for FakeBridge {
    fn capture_image(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

impl NativePermissions for FakeBridge {
    fn check_or_request(&self, _kind: PermissionKind) -> Result<PermissionStatus> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.permission)
    }
}

impl NativeMediaStore for FakeBridge {
    fn copy_into_public_index(
        &self,
        source: &Path,
        display_name: &str,
        collection: PublicCollection,
        _mime_type: &str,
    ) -> Result<String> {
        *self.last_collection.lock().expect("collection lock") = Some(collection);
        self.copy_public(source, display_name)?;
        Ok(format!("content://fake/{display_name}"))
    }

    fn copy_to_legacy_public_directory(
        &self,
        source: &Path,
        display_name: &str,
    ) -> Result<PathBuf> {
        self.copy_public(source, display_name)
    }
}
