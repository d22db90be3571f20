// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanvault-document — Document processing for the ScanVault engine.
//
// Provides the paginated-document renderer (a captured image placed on a
// fixed page box, centered and aspect-fit) and page-preserving PDF merge.

pub mod pdf;

pub use pdf::merge::{merge_files, page_count};
pub use pdf::render::PdfRenderer;
