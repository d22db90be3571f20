// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-preserving PDF merge using the `lopdf` crate.
//
// The merged document is built from scratch: an empty page tree is allocated
// and every page of every input is deep-cloned into it, in input order. Page
// count and order are the only structure carried over — no de-duplication,
// no reordering.

use std::path::Path;

use lopdf::{Document, Object, ObjectId, dictionary};
use scanvault_core::error::ScanVaultError;
use tracing::{debug, info, instrument, warn};

/// Merge the given PDF files into a single document, returned as serialised
/// PDF bytes.
///
/// Pages appear in input-list order; each input's internal page order is
/// preserved.
#[instrument(skip_all, fields(input_count = inputs.len()))]
pub fn merge_files<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<u8>, ScanVaultError> {
    let mut merged = Document::with_version("1.5");

    // Allocate the page tree up front so cloned pages can parent onto it.
    let pages_id = merged.new_object_id();
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        }),
    );

    let mut total_pages = 0usize;

    for (index, input) in inputs.iter().enumerate() {
        let path = input.as_ref();
        let source = Document::load(path).map_err(|err| {
            ScanVaultError::Pdf(format!("failed to open {}: {}", path.display(), err))
        })?;

        let source_pages = source.get_pages();
        debug!(
            input = index + 1,
            pages = source_pages.len(),
            "appending document"
        );

        let mut page_numbers: Vec<u32> = source_pages.keys().copied().collect();
        page_numbers.sort();

        for page_num in page_numbers {
            append_page(&source, &mut merged, source_pages[&page_num], pages_id)?;
            total_pages += 1;
        }
    }

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    merged.save_to(&mut output).map_err(|err| {
        ScanVaultError::Pdf(format!("failed to serialise merged PDF: {}", err))
    })?;

    info!(total_pages, output_bytes = output.len(), "merge complete");
    Ok(output)
}

/// Number of pages in a PDF file on disk.
pub fn page_count(path: impl AsRef<Path>) -> Result<usize, ScanVaultError> {
    let path_ref = path.as_ref();
    let doc = Document::load(path_ref).map_err(|err| {
        ScanVaultError::Pdf(format!("failed to open {}: {}", path_ref.display(), err))
    })?;
    Ok(doc.get_pages().len())
}

/// Deep-clone a single page (and its referenced resources) from `source`
/// into `target`, appending it as the last page of `pages_id`.
fn append_page(
    source: &Document,
    target: &mut Document,
    page_id: ObjectId,
    pages_id: ObjectId,
) -> Result<(), ScanVaultError> {
    let page_object = source.get_object(page_id).map_err(|err| {
        ScanVaultError::Pdf(format!("cannot read page object {:?}: {}", page_id, err))
    })?;

    let cloned = deep_clone_object(source, target, page_object)?;
    let cloned_id = target.add_object(cloned);

    // Register the page with the target's page tree.
    if let Ok(Object::Dictionary(pages_dict)) = target.get_object_mut(pages_id) {
        if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
            kids.push(Object::Reference(cloned_id));
        }
        if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
            *count += 1;
        }
    }

    // Point the cloned page's /Parent at the target page tree.
    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

/// Deep-clone a single lopdf Object, recursively resolving references.
///
/// /Parent is deliberately skipped to avoid circular cloning; the caller
/// patches it after the page lands in the target tree.
fn deep_clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
) -> Result<Object, ScanVaultError> {
    match object {
        Object::Dictionary(dict) => {
            let mut new_dict = lopdf::Dictionary::new();
            for (key, value) in dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(deep_clone_object(source, target, item)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => {
            // Resolve in the source, clone, and re-reference in the target.
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    let cloned = deep_clone_object(source, target, referenced)?;
                    let new_id = target.add_object(cloned);
                    Ok(Object::Reference(new_id))
                }
                Err(err) => {
                    warn!(?ref_id, %err, "cannot resolve reference, using Null");
                    Ok(Object::Null)
                }
            }
        }
        Object::Stream(stream) => {
            let mut new_dict = lopdf::Dictionary::new();
            for (key, value) in stream.dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Stream(lopdf::Stream::new(
                new_dict,
                stream.content.clone(),
            )))
        }
        other => Ok(other.clone()),
    }
}
