//! Document backends and the geometry the strip core needs from them

mod backend;
mod error;
#[cfg(feature = "pdf")]
mod mupdf_backend;
mod outline;

pub use backend::*;
pub use error::{OpenError, RenderError};
#[cfg(feature = "pdf")]
pub use mupdf_backend::MupdfDocument;
pub use outline::{OutlineEntry, OutlineTree};
