//! Continuous page strip: raster cache, view state, scrolling, zoom and
//! paint planning.
//!
//! The document is treated as one vertical strip of rendered pages separated
//! by [`CLEARANCE`] pixels. Position within the strip is a page index plus a
//! normalized line in `[0, 1]`, so it survives zoom and rotation changes.

mod cache;
mod paint;
mod scroll;
mod state;
mod types;
mod viewer;
mod zoom;

pub use cache::{RasterCache, page_extent, rasterize};
pub use paint::{PlacedPage, Placement, Surface, layout, paint, plan};
pub use scroll::{ScrollDirection, scroll_horizontal, scroll_page, scroll_vertical, seek, seek_last};
pub use state::{StartPosition, ViewState, clamp_line, clamp_scale, normalize_bias, normalize_bias_with};
pub use types::{RasterImage, RenderParams, Viewport};
pub use viewer::{Command, Effect, Status, Viewer, ViewerConfig};
pub use zoom::{rescale, rotate};

/// Gap between consecutive pages in pixels
pub const CLEARANCE: u32 = 2;

/// Default scroll step in pixels (arrow keys, mouse wheel)
pub const SCROLL_STEP: f32 = 80.0;

/// Fraction of the viewport height scrolled by PageUp/PageDown
pub const PAGE_SCROLL_FRACTION: f32 = 0.95;

/// Zoom limits and default step
pub const SCALE_MIN: f32 = 0.1;
pub const SCALE_MAX: f32 = 10.0;
pub const ZOOM_STEP: f32 = 0.1;

/// Number of rendered pages kept in memory
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Byte value new raster buffers are filled with (white)
pub const BACKGROUND: u8 = 0xff;

/// Target screen resolution for rendering
pub const DEFAULT_DPI: f32 = 96.0;
