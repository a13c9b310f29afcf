//! MuPDF document backend

#![cfg(feature = "pdf")]

use std::path::{Path, PathBuf};

use log::{debug, info};
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::backend::{DocumentBackend, OutlineNode, PageRect, PixelTarget, Transform};
use super::error::{OpenError, RenderError};

pub struct MupdfDocument {
    path: PathBuf,
    doc: Document,
    page_count: usize,
}

impl MupdfDocument {
    pub fn open(path: &Path) -> Result<Self, OpenError> {
        let pdf_error = |source| OpenError::Pdf {
            path: path.to_path_buf(),
            source,
        };
        let doc = Document::open(path.to_string_lossy().as_ref()).map_err(pdf_error)?;
        let page_count = doc.page_count().map_err(pdf_error)?.max(0) as usize;
        if page_count == 0 {
            return Err(OpenError::Empty {
                path: path.to_path_buf(),
            });
        }

        info!("Opened {path:?}: {page_count} pages");
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            page_count,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_page(&self, page: usize) -> Result<mupdf::Page, RenderError> {
        if page >= self.page_count {
            return Err(RenderError::PageOutOfRange {
                page,
                count: self.page_count,
            });
        }
        Ok(self.doc.load_page(page as i32)?)
    }
}

impl DocumentBackend for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_bounds(&self, page: usize) -> Result<PageRect, RenderError> {
        let bounds = self.load_page(page)?.bounds()?;
        Ok(PageRect::new(bounds.x0, bounds.y0, bounds.x1, bounds.y1))
    }

    fn render_into(
        &self,
        page: usize,
        transform: &Transform,
        target: &mut PixelTarget<'_>,
    ) -> Result<(), RenderError> {
        let fz_page = self.load_page(page)?;
        let matrix = Matrix::new(
            transform.a,
            transform.b,
            transform.c,
            transform.d,
            transform.e,
            transform.f,
        );
        let rgb = Colorspace::device_rgb();
        // MuPDF clears an opaque pixmap to white, the same value the target holds
        let pixmap = fz_page.to_pixmap(&matrix, &rgb, false, false)?;
        if pixmap.width() != target.width() || pixmap.height() != target.height() {
            debug!(
                "page {page}: pixmap {}x{} vs target {}x{}",
                pixmap.width(),
                pixmap.height(),
                target.width(),
                target.height()
            );
        }
        copy_to_bgra(page, &pixmap, target)
    }

    fn outline(&self) -> Vec<OutlineNode> {
        match self.doc.outlines() {
            Ok(outlines) => convert_outlines(&outlines),
            Err(e) => {
                debug!("No outline for {:?}: {e}", self.path);
                Vec::new()
            }
        }
    }

    fn title(&self) -> Option<String> {
        self.doc
            .metadata(mupdf::MetadataName::Title)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

fn copy_to_bgra(
    page: usize,
    pixmap: &Pixmap,
    target: &mut PixelTarget<'_>,
) -> Result<(), RenderError> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(RenderError::backend(
            page,
            format!("unsupported pixmap format: {n} channels"),
        ));
    }

    let src_stride = pixmap.stride() as usize;
    let width = (pixmap.width().min(target.width())) as usize;
    let height = (pixmap.height().min(target.height())) as usize;
    let samples = pixmap.samples();
    if samples.len() < src_stride.saturating_mul(height) || width * n > src_stride {
        return Err(RenderError::backend(page, "pixmap buffer size mismatch"));
    }

    let dst_stride = target.stride();
    for y in 0..height {
        let src = &samples[y * src_stride..y * src_stride + width * n];
        let dst = &mut target.pixels[y * dst_stride..y * dst_stride + width * 4];
        for (px, out) in src.chunks_exact(n).zip(dst.chunks_exact_mut(4)) {
            out[0] = px[2];
            out[1] = px[1];
            out[2] = px[0];
            out[3] = 0xff;
        }
    }
    Ok(())
}

fn convert_outlines(outlines: &[mupdf::Outline]) -> Vec<OutlineNode> {
    outlines
        .iter()
        .map(|outline| OutlineNode {
            title: outline.title.clone(),
            page: outline.dest.map(|dest| dest.loc.page_number as usize),
            children: convert_outlines(&outline.down),
        })
        .collect()
}
