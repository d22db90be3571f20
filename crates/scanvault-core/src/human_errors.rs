// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error and outcome messages for the UI layer.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity levels drive icon and colour choices in the presentation
// layer.

use crate::error::{SaveStage, ScanVaultError};
use crate::types::ArtifactFormat;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Transient condition — trying again may well succeed.
    Transient,
    /// User must do something (free up space, grant a permission, reselect).
    ActionRequired,
    /// Cannot be fixed by retrying or user action.
    Permanent,
}

/// A human-readable error with a plain English message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same action makes sense.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `ScanVaultError` into a `HumanError` for direct display.
pub fn humanize_error(err: &ScanVaultError) -> HumanError {
    match err {
        ScanVaultError::SaveFailed { stage, .. } => match stage {
            SaveStage::PrepareFolder | SaveStage::CopyImage | SaveStage::WriteDocument => {
                HumanError {
                    message: "The scan couldn't be saved.".into(),
                    suggestion: "Your device's storage may be full. Free up some space and try again.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
            SaveStage::ReadSource => HumanError {
                message: "The captured image couldn't be read.".into(),
                suggestion: "Try scanning the document again.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
            SaveStage::RenderDocument => HumanError {
                message: "The PDF couldn't be created from this scan.".into(),
                suggestion: "The captured image may be damaged. Try scanning the document again.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },

        ScanVaultError::MergePrecondition(detail) => HumanError {
            message: "These files can't be combined.".into(),
            suggestion: format!("Pick at least two PDF documents to combine. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanVaultError::Pdf(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try scanning the document again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanVaultError::Image(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try scanning again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanVaultError::NotFound(what) => HumanError {
            message: format!("{what} is no longer on this device."),
            suggestion: "It may have been deleted. You can remove the stale entry from the list.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanVaultError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to access that file.".into(),
                    suggestion: "Check the app's storage permission in your device settings.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        ScanVaultError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanVaultError::Bridge(_) => HumanError {
            message: "A device-specific feature didn't work.".into(),
            suggestion: "Try restarting the app. Some features may not be available on all devices.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanVaultError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Exporting to public storage requires a supported phone or tablet.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// User-facing summary line after a save flow completes.
///
/// Export is best-effort, so the message distinguishes "saved and exported"
/// from "saved in the app only".
pub fn save_outcome_message(format: ArtifactFormat, exported: bool) -> String {
    match (format, exported) {
        (ArtifactFormat::Image, true) => "JPEG saved in the app and added to the gallery.".into(),
        (ArtifactFormat::Image, false) => {
            "JPEG saved in the app. (Adding it to the gallery didn't work on this device.)".into()
        }
        (ArtifactFormat::Document, true) => "PDF saved in the app and exported to Downloads.".into(),
        (ArtifactFormat::Document, false) => {
            "PDF saved in the app. (Exporting to Downloads didn't work on this device.)".into()
        }
    }
}
