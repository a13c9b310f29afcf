//! The viewer: one open document and everything needed to display it

use log::{debug, info, warn};

use super::cache::RasterCache;
use super::paint::{self, Placement, Surface};
use super::scroll::{self, ScrollDirection};
use super::state::{StartPosition, ViewState};
use super::types::Viewport;
use super::zoom;
use super::{DEFAULT_CACHE_CAPACITY, DEFAULT_DPI, PAGE_SCROLL_FRACTION, SCROLL_STEP, ZOOM_STEP};
use crate::pdf::{DocumentBackend, OutlineTree, RenderError};

/// Tunables that stay fixed while a document is open
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerConfig {
    pub scroll_step: f32,
    pub page_scroll_fraction: f32,
    pub zoom_step: f32,
    pub dpi: f32,
    pub cache_capacity: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scroll_step: SCROLL_STEP,
            page_scroll_fraction: PAGE_SCROLL_FRACTION,
            zoom_step: ZOOM_STEP,
            dpi: DEFAULT_DPI,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Commands that can be applied to the viewer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Scroll down (positive) or up by this many pixels
    ScrollVertical(f32),
    /// Pan right (positive) or left by this many pixels
    ScrollHorizontal(f32),
    ScrollPage(ScrollDirection),
    /// Change the scale by this amount
    Zoom(f32),
    /// Zoom by the configured step
    ZoomIn,
    ZoomOut,
    /// Rotate by this many degrees
    Rotate(f32),
    /// Jump to the top of a page (0-indexed)
    SeekPage(usize),
    SeekLast,
    Resize(Viewport),
}

/// Effects produced by applying commands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Repaint,
    /// Current page changed (0-indexed)
    PageChanged(usize),
}

/// Summary for the status bar
#[derive(Clone, Debug, PartialEq)]
pub struct Status {
    /// Current page, 1-based
    pub page: usize,
    pub page_count: usize,
    pub scale_percent: u32,
    pub rotation: f32,
    pub title: Option<String>,
}

#[derive(Clone, Copy, PartialEq)]
struct Snapshot {
    page: usize,
    line: f32,
    bias: f32,
    scale: f32,
    rotation: f32,
}

/// Owns the document, its view state and the viewport
pub struct Viewer<D: DocumentBackend> {
    doc: D,
    state: ViewState,
    viewport: Viewport,
    config: ViewerConfig,
    outline: OutlineTree,
    title: Option<String>,
}

impl<D: DocumentBackend> Viewer<D> {
    pub fn open(doc: D, start: StartPosition, config: ViewerConfig) -> Self {
        let page_count = doc.page_count();
        let cache = RasterCache::with_dpi(config.cache_capacity, config.dpi);
        let state =
            ViewState::with_start(page_count, cache, start).with_scroll_step(config.scroll_step);
        let outline = OutlineTree::from_nodes(&doc.outline());
        let title = doc.title();

        info!(
            "Viewer opened: {page_count} pages, {} outline entries, starting at page {}",
            outline.len(),
            state.page() + 1
        );
        Self {
            doc,
            state,
            viewport: Viewport::default(),
            config,
            outline,
            title,
        }
    }

    /// Apply a command and return resulting effects.
    ///
    /// A command that fails in the backend leaves the view untouched and
    /// produces no effects.
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        let before = self.snapshot();

        let result: Result<(), RenderError> = match cmd {
            Command::ScrollVertical(delta) => {
                scroll::scroll_vertical(&mut self.state, &self.doc, delta)
            }
            Command::ScrollHorizontal(delta) => {
                scroll::scroll_horizontal(&mut self.state, delta);
                Ok(())
            }
            Command::ScrollPage(direction) => scroll::scroll_page(
                &mut self.state,
                &self.doc,
                self.viewport.height,
                self.config.page_scroll_fraction,
                direction,
            ),
            Command::Zoom(delta) => {
                zoom::rescale(&mut self.state, delta);
                Ok(())
            }
            Command::ZoomIn => {
                zoom::rescale(&mut self.state, self.config.zoom_step);
                Ok(())
            }
            Command::ZoomOut => {
                zoom::rescale(&mut self.state, -self.config.zoom_step);
                Ok(())
            }
            Command::Rotate(degrees) => {
                zoom::rotate(&mut self.state, degrees);
                Ok(())
            }
            Command::SeekPage(page) => {
                scroll::seek(&mut self.state, page, 0.0);
                Ok(())
            }
            Command::SeekLast => {
                scroll::seek_last(&mut self.state);
                Ok(())
            }
            Command::Resize(viewport) => {
                if self.viewport == viewport {
                    return vec![];
                }
                debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
                self.viewport = viewport;
                return vec![Effect::Repaint];
            }
        };

        if let Err(e) = result {
            warn!("{cmd:?} failed: {e}");
            return vec![];
        }

        let after = self.snapshot();
        let mut effects = Vec::new();
        if after != before {
            effects.push(Effect::Repaint);
        }
        if after.page != before.page {
            effects.push(Effect::PageChanged(after.page));
        }
        effects
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            page: self.state.page(),
            line: self.state.line(),
            bias: self.state.bias(),
            scale: self.state.scale(),
            rotation: self.state.rotation(),
        }
    }

    /// Paint the visible pages onto `surface`
    pub fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Vec<Placement> {
        match paint::paint(&mut self.state, &self.doc, self.viewport, surface) {
            Ok(placements) => placements,
            Err(e) => {
                warn!("Paint failed: {e}");
                Vec::new()
            }
        }
    }

    /// Geometry of the visible pages
    pub fn layout(&mut self) -> Vec<Placement> {
        match paint::layout(&mut self.state, &self.doc, self.viewport) {
            Ok(placements) => placements,
            Err(e) => {
                warn!("Layout failed: {e}");
                Vec::new()
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            page: self.state.page() + 1,
            page_count: self.state.page_count(),
            scale_percent: (self.state.scale() * 100.0).round() as u32,
            rotation: self.state.rotation(),
            title: self.title.clone(),
        }
    }

    #[must_use]
    pub fn outline(&self) -> &OutlineTree {
        &self.outline
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.doc
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Release every cached image, returning how many were held
    pub fn close(&mut self) -> usize {
        let released = self.state.close();
        info!("Viewer closed, released {released} images");
        released
    }
}
