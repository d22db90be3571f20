// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export resolver — copy an app-owned artifact into OS-visible public
// storage.
//
// Export is always best-effort relative to the already-safe app-local copy:
// a denied permission or a failed public copy resolves to `Ok(None)`, never
// an error. Only a missing app-local source is an error, and a distinct one
// (`NotFound`), so callers can offer "remove stale entry" instead of
// "retry".

use std::path::Path;
use std::sync::Arc;

use scanvault_bridge::traits::{PlatformBridge, StorageCapabilities};
use scanvault_core::error::{Result, ScanVaultError};
use scanvault_core::types::{ArtifactFormat, PermissionKind, PermissionStatus, PublicCollection};
use tracing::{info, instrument, warn};

/// How artifacts reach public storage on this platform.
///
/// Selected once at startup from the bridge's capability probe; a new
/// platform storage model becomes a new variant here rather than another
/// version comparison at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStrategy {
    /// Scoped public-storage APIs: register into shared collections, no
    /// broad permission required.
    ScopedIndex,
    /// Pre-scoped platforms: legacy write permission, then direct copies.
    LegacyDirect,
}

impl ExportStrategy {
    pub fn detect(capabilities: &StorageCapabilities) -> Self {
        if capabilities.scoped_public_index {
            Self::ScopedIndex
        } else {
            Self::LegacyDirect
        }
    }
}

/// Copies app-owned artifacts into public storage under the detected
/// strategy.
pub struct ExportResolver {
    bridge: Arc<dyn PlatformBridge>,
    strategy: ExportStrategy,
}

impl ExportResolver {
    /// Build a resolver, probing the bridge's capabilities once.
    pub fn new(bridge: Arc<dyn PlatformBridge>) -> Self {
        let strategy = ExportStrategy::detect(&bridge.storage_capabilities());
        info!(
            ?strategy,
            platform = bridge.platform_name(),
            "export strategy selected"
        );
        Self { bridge, strategy }
    }

    /// Override the detected strategy.
    pub fn with_strategy(bridge: Arc<dyn PlatformBridge>, strategy: ExportStrategy) -> Self {
        Self { bridge, strategy }
    }

    pub fn strategy(&self) -> ExportStrategy {
        self.strategy
    }

    /// Export an app-owned artifact to public storage.
    ///
    /// Returns the public locator on success, `Ok(None)` on any soft
    /// failure, and `Err(NotFound)` if the app-local file no longer exists.
    #[instrument(skip_all, fields(path = %app_path.display(), display_name))]
    pub fn export(
        &self,
        app_path: &Path,
        format: ArtifactFormat,
        display_name: &str,
    ) -> Result<Option<String>> {
        if !app_path.exists() {
            return Err(ScanVaultError::NotFound(display_name.to_string()));
        }

        match self.strategy {
            ExportStrategy::ScopedIndex => self.export_scoped(app_path, format, display_name),
            ExportStrategy::LegacyDirect => self.export_legacy(app_path, format, display_name),
        }
    }

    fn export_scoped(
        &self,
        app_path: &Path,
        format: ArtifactFormat,
        display_name: &str,
    ) -> Result<Option<String>> {
        match self.bridge.copy_into_public_index(
            app_path,
            display_name,
            format.public_collection(),
            format.mime_type(),
        ) {
            Ok(locator) => {
                info!(%locator, "artifact exported to public index");
                Ok(Some(locator))
            }
            Err(err) => {
                warn!(%err, "public index registration failed");
                Ok(None)
            }
        }
    }

    fn export_legacy(
        &self,
        app_path: &Path,
        format: ArtifactFormat,
        display_name: &str,
    ) -> Result<Option<String>> {
        match self.bridge.check_or_request(PermissionKind::LegacyWrite) {
            Ok(PermissionStatus::Granted) => {}
            Ok(PermissionStatus::Denied) => {
                info!("legacy write permission denied, keeping app-local copy only");
                return Ok(None);
            }
            Err(err) => {
                warn!(%err, "permission check failed");
                return Ok(None);
            }
        }

        let outcome = match format {
            // The photo index predates scoped storage; with the legacy
            // permission granted it accepts registrations on old platforms
            // too.
            ArtifactFormat::Image => self
                .bridge
                .copy_into_public_index(
                    app_path,
                    display_name,
                    PublicCollection::Photos,
                    format.mime_type(),
                )
                .map(Some),
            ArtifactFormat::Document => self
                .bridge
                .copy_to_legacy_public_directory(app_path, display_name)
                .map(|path| Some(path.display().to_string())),
        };

        match outcome {
            Ok(locator) => {
                if let Some(loc) = &locator {
                    info!(locator = %loc, "artifact exported via legacy path");
                }
                Ok(locator)
            }
            Err(err) => {
                warn!(%err, "legacy public copy failed");
                Ok(None)
            }
        }
    }
}
