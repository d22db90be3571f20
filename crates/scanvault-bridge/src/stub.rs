// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are
// unavailable.
//
// Every trait method returns `PlatformUnavailable` — the real implementation
// lives in the `android` module. Export flows treat bridge failures as soft,
// so the engine still works app-locally on top of this stub.

use std::path::{Path, PathBuf};

use scanvault_core::error::{Result, ScanVaultError};
use scanvault_core::types::{PermissionKind, PermissionStatus, PublicCollection};

use crate::traits::*;

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn storage_capabilities(&self) -> StorageCapabilities {
        StorageCapabilities {
            scoped_public_index: false,
        }
    }
}

impl NativeCapture for StubBridge {
    fn capture_image(&self) -> Result<Option<PathBuf>> {
        tracing::warn!("NativeCapture::capture_image called on stub bridge");
        Err(ScanVaultError::PlatformUnavailable)
    }
}

impl NativePermissions for StubBridge {
    fn check_or_request(&self, _kind: PermissionKind) -> Result<PermissionStatus> {
        tracing::warn!("NativePermissions::check_or_request called on stub bridge");
        Err(ScanVaultError::PlatformUnavailable)
    }
}

impl NativeMediaStore for StubBridge {
    fn copy_into_public_index(
        &self,
        _source: &Path,
        _display_name: &str,
        _collection: PublicCollection,
        _mime_type: &str,
    ) -> Result<String> {
        tracing::warn!("NativeMediaStore::copy_into_public_index called on stub bridge");
        Err(ScanVaultError::PlatformUnavailable)
    }

    fn copy_to_legacy_public_directory(
        &self,
        _source: &Path,
        _display_name: &str,
    ) -> Result<PathBuf> {
        Err(ScanVaultError::PlatformUnavailable)
    }
}
