//! Error taxonomy for document backends

use std::path::PathBuf;

/// Failure to open a document. Fatal for startup.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[cfg(feature = "pdf")]
    #[error("cannot open {path:?}: {source}")]
    Pdf {
        path: PathBuf,
        #[source]
        source: mupdf::error::Error,
    },

    #[error("{path:?} has no pages")]
    Empty { path: PathBuf },

    #[error("no document backend compiled in (enable the `pdf` feature) for {path:?}")]
    Unsupported { path: PathBuf },
}

/// Failure to render one page at one transform.
///
/// Never leaves a partial image behind in the raster cache.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("page {page}: {detail}")]
    Backend { page: usize, detail: String },
}

impl RenderError {
    pub fn backend(page: usize, detail: impl Into<String>) -> Self {
        Self::Backend {
            page,
            detail: detail.into(),
        }
    }
}
