// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF renderer — place a captured scan image on a fixed page using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use scanvault_core::PaperSize;
use scanvault_core::error::ScanVaultError;
use tracing::{debug, info, instrument};

/// Renders a single captured image into a one-page PDF.
///
/// The image is centered inside the page margins and scaled to fill the
/// usable box while preserving its aspect ratio. Small captures are scaled
/// up — a phone scan should occupy the page, not sit in a corner.
pub struct PdfRenderer {
    /// Page size for rendered documents.
    paper_size: PaperSize,
    /// Margin around the usable box, in millimetres.
    margin_mm: f32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfRenderer {
    /// Create a renderer targeting the given page geometry.
    pub fn new(paper_size: PaperSize, margin_mm: f32) -> Self {
        Self {
            paper_size,
            margin_mm,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Page dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Render a single-page PDF containing the given image, returned as
    /// serialised PDF bytes.
    #[instrument(skip(self, image_bytes), fields(bytes_len = image_bytes.len()))]
    pub fn render_image_page(&self, image_bytes: &[u8]) -> Result<Vec<u8>, ScanVaultError> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Scanned Document");

        info!(paper = ?self.paper_size, title, "rendering scan page");

        // Decode the image to get its dimensions and pixel data.
        let dynamic_image = ::image::load_from_memory(image_bytes).map_err(|err| {
            ScanVaultError::Image(format!("failed to decode captured image: {}", err))
        })?;

        let img_width = dynamic_image.width() as usize;
        let img_height = dynamic_image.height() as usize;

        // Convert to RGB8 for printpdf.
        let rgb_image = dynamic_image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        // Usable box inside the margins.
        let usable_w_pt = Mm(page_w.0 - 2.0 * self.margin_mm).into_pt().0;
        let usable_h_pt = Mm(page_h.0 - 2.0 * self.margin_mm).into_pt().0;

        // Image native size at a default DPI of 150.
        let dpi: f32 = 150.0;
        let img_w_pt = img_width as f32 / dpi * 72.0;
        let img_h_pt = img_height as f32 / dpi * 72.0;

        // Fit-to-box scale, aspect preserved. Upscaling is intentional.
        let scale_x = usable_w_pt / img_w_pt;
        let scale_y = usable_h_pt / img_h_pt;
        let scale = scale_x.min(scale_y);

        let rendered_w_pt = img_w_pt * scale;
        let rendered_h_pt = img_h_pt * scale;

        // Centre the image on the page.
        let margin_pt = Mm(self.margin_mm).into_pt().0;
        let x_offset = margin_pt + (usable_w_pt - rendered_w_pt) / 2.0;
        let y_offset = margin_pt + (usable_h_pt - rendered_h_pt) / 2.0;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_offset)),
                translate_y: Some(Pt(y_offset)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(dpi),
                rotate: None,
            },
        }];

        let page = PdfPage::new(page_w, page_h, ops);
        doc.with_pages(vec![page]);

        debug!(rendered_w_pt, rendered_h_pt, scale, "image placed on page");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(output)
    }
}
