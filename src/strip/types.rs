//! Core types for the page strip

/// Rendering parameters an image is valid for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    /// User zoom factor (1.0 = 100%)
    pub scale: f32,
    /// Rotation in degrees
    pub rotation: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// A rendered page.
///
/// Pixels are BGRA, 4 bytes per pixel, rows packed without padding.
pub struct RasterImage {
    /// Page number (0-indexed)
    pub page: usize,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Parameters the pixels were produced with
    pub params: RenderParams,
}

impl RasterImage {
    /// BGRA value at `(x, y)`
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    #[must_use]
    pub fn is_valid_for(&self, params: RenderParams) -> bool {
        self.params == params
            && self.pixels.len() == 4 * self.width as usize * self.height as usize
    }

    /// Drop the pixel buffer, keeping the identity of the image
    pub(crate) fn release(&mut self) {
        self.pixels = Vec::new();
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("page", &self.page)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .field("params", &self.params)
            .finish()
    }
}

/// Size of the paint area in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
