// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native storage capabilities.

use std::path::{Path, PathBuf};

use scanvault_core::error::Result;
use scanvault_core::types::{PermissionKind, PermissionStatus, PublicCollection};

/// What the platform's storage stack supports, probed once at startup.
///
/// Export strategy selection keys off these flags rather than raw OS version
/// numbers, so a new platform generation slots in as a new probe result
/// instead of another scattered version comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageCapabilities {
    /// The platform offers scoped public-storage APIs: artifacts can be
    /// registered into shared collections without a broad write permission.
    pub scoped_public_index: bool,
}

/// Unified bridge that groups all native capabilities the engine needs.
pub trait PlatformBridge: NativeCapture + NativePermissions + NativeMediaStore + Send + Sync {
    /// Human-readable platform name (e.g. "Android 14").
    fn platform_name(&self) -> &str;

    /// Probe the platform's storage capabilities.
    fn storage_capabilities(&self) -> StorageCapabilities;
}

/// Capture images with the device camera / scanner UI.
pub trait NativeCapture {
    /// Launch the system capture flow and return the file path of the raw
    /// captured image. Returns Ok(None) if the user cancelled.
    fn capture_image(&self) -> Result<Option<PathBuf>>;
}

/// Storage permission checks and requests.
pub trait NativePermissions {
    /// Check a permission, prompting only if it is not already granted.
    ///
    /// Idempotent: an already-granted permission returns `Granted` without
    /// any prompt.
    fn check_or_request(&self, kind: PermissionKind) -> Result<PermissionStatus>;
}

/// Copies into OS-visible public storage.
pub trait NativeMediaStore {
    /// Register an app-owned file with a shared public collection, returning
    /// the public locator the OS assigned (e.g. a `content://` URI).
    fn copy_into_public_index(
        &self,
        source: &Path,
        display_name: &str,
        collection: PublicCollection,
        mime_type: &str,
    ) -> Result<String>;

    /// Copy an app-owned file directly into the public downloads directory,
    /// replacing any same-named prior file. Fallback for platforms without
    /// scoped public-storage APIs; requires the legacy write permission.
    fn copy_to_legacy_public_directory(
        &self,
        source: &Path,
        display_name: &str,
    ) -> Result<PathBuf>;
}
