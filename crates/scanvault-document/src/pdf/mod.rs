// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — rendering scans onto pages and merging existing documents.

pub mod merge;
pub mod render;

pub use merge::merge_files;
pub use render::PdfRenderer;
