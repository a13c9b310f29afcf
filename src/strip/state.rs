//! View state: where in the strip we are and how pages are rendered

use super::cache::RasterCache;
use super::types::{RasterImage, RenderParams};
use super::{SCALE_MAX, SCALE_MIN, SCROLL_STEP};
use crate::pdf::{DocumentBackend, RenderError};

/// Clamp a scale factor into `[SCALE_MIN, SCALE_MAX]`.
///
/// NaN becomes 1.0; infinities go to the nearest bound.
#[must_use]
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        1.0
    } else {
        scale.clamp(SCALE_MIN, SCALE_MAX)
    }
}

#[must_use]
pub fn clamp_line(line: f32) -> f32 {
    if line.is_nan() {
        0.0
    } else {
        line.clamp(0.0, 1.0)
    }
}

/// Snap `bias` to 0 when it is within half the default scroll step
#[must_use]
pub fn normalize_bias(bias: f32) -> f32 {
    normalize_bias_with(bias, SCROLL_STEP / 2.0)
}

/// Snap `bias` to 0 when `|bias| <= radius`
#[must_use]
pub fn normalize_bias_with(bias: f32, radius: f32) -> f32 {
    if !bias.is_finite() || bias.abs() <= radius {
        0.0
    } else {
        bias
    }
}

/// Initial position for a freshly opened document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartPosition {
    /// Page (0-indexed)
    pub page: usize,
    pub line: f32,
    pub bias: f32,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for StartPosition {
    fn default() -> Self {
        Self {
            page: 0,
            line: 0.0,
            bias: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// Current page, line, bias, scale and rotation, plus the cache of rendered
/// pages. Every setter clamps, so the fields always hold valid values.
#[derive(Debug)]
pub struct ViewState {
    page: usize,
    line: f32,
    bias: f32,
    scale: f32,
    rotation: f32,
    page_count: usize,
    snap_radius: f32,
    cache: RasterCache,
}

impl ViewState {
    #[must_use]
    pub fn new(page_count: usize, cache: RasterCache) -> Self {
        Self::with_start(page_count, cache, StartPosition::default())
    }

    #[must_use]
    pub fn with_start(page_count: usize, cache: RasterCache, start: StartPosition) -> Self {
        let mut state = Self {
            page: 0,
            line: 0.0,
            bias: 0.0,
            scale: 1.0,
            rotation: 0.0,
            page_count,
            snap_radius: SCROLL_STEP / 2.0,
            cache,
        };
        state.set_position(start.page, start.line);
        state.set_scale(start.scale);
        state.set_rotation(start.rotation);
        state.set_bias(start.bias);
        state
    }

    /// Use half of `scroll_step` as the bias snap radius
    #[must_use]
    pub fn with_scroll_step(mut self, scroll_step: f32) -> Self {
        self.snap_radius = (scroll_step / 2.0).max(0.0);
        self.bias = normalize_bias_with(self.bias, self.snap_radius);
        self
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn line(&self) -> f32 {
        self.line
    }

    #[must_use]
    pub fn bias(&self) -> f32 {
        self.bias
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn last_page(&self) -> usize {
        self.page_count.saturating_sub(1)
    }

    #[must_use]
    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            scale: self.scale,
            rotation: self.rotation,
        }
    }

    pub fn set_position(&mut self, page: usize, line: f32) {
        self.page = page.min(self.last_page());
        self.line = clamp_line(line);
    }

    pub fn set_bias(&mut self, bias: f32) {
        self.bias = normalize_bias_with(bias, self.snap_radius);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = clamp_scale(scale);
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        if rotation.is_finite() {
            self.rotation = rotation;
        }
    }

    /// Image for `page` at the current parameters
    pub fn image<D: DocumentBackend + ?Sized>(
        &mut self,
        doc: &D,
        page: usize,
    ) -> Result<&RasterImage, RenderError> {
        let params = self.render_params();
        self.cache.get(doc, page, params)
    }

    /// Pixel size of `page` at the current parameters
    pub fn extent<D: DocumentBackend + ?Sized>(
        &mut self,
        doc: &D,
        page: usize,
    ) -> Result<(u32, u32), RenderError> {
        let params = self.render_params();
        self.cache.extent(doc, page, params)
    }

    #[must_use]
    pub fn cache(&self) -> &RasterCache {
        &self.cache
    }

    /// Drain the cache, returning how many images were released
    pub fn close(&mut self) -> usize {
        self.cache.clear()
    }
}
