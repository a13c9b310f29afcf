//! LRU raster cache for rendered pages

use std::num::NonZeroUsize;

use log::{debug, warn};
use lru::LruCache;

use super::types::{RasterImage, RenderParams};
use super::{BACKGROUND, DEFAULT_CACHE_CAPACITY, DEFAULT_DPI};
use crate::pdf::{DocumentBackend, PixelTarget, RenderError, Transform};

/// Render `page` at `params` into a fresh buffer
pub fn rasterize<D: DocumentBackend + ?Sized>(
    doc: &D,
    page: usize,
    params: RenderParams,
    dpi: f32,
) -> Result<RasterImage, RenderError> {
    let transform = Transform::for_page(params.scale, params.rotation, dpi);
    let bbox = transform.apply_rect(&doc.page_bounds(page)?).round_out();
    let (width, height) = (bbox.width(), bbox.height());

    let mut pixels = vec![BACKGROUND; 4 * width as usize * height as usize];
    doc.render_into(
        page,
        &transform,
        &mut PixelTarget {
            bbox,
            pixels: &mut pixels,
        },
    )?;

    debug!(
        "Rendered page {page} at scale {:.2} rotation {}: {width}x{height}",
        params.scale, params.rotation
    );
    Ok(RasterImage {
        page,
        width,
        height,
        pixels,
        params,
    })
}

/// Pixel size of `page` at `params` computed from its bounds alone
pub fn page_extent<D: DocumentBackend + ?Sized>(
    doc: &D,
    page: usize,
    params: RenderParams,
    dpi: f32,
) -> Result<(u32, u32), RenderError> {
    let transform = Transform::for_page(params.scale, params.rotation, dpi);
    let bbox = transform.apply_rect(&doc.page_bounds(page)?).round_out();
    Ok((bbox.width(), bbox.height()))
}

enum Lookup {
    Fresh,
    Stale,
    Missing,
}

/// Bounded page index -> image map in most-recently-used order.
///
/// Every image handed out is valid for the parameters it was requested with.
/// Images rendered at outdated parameters are re-rendered in place, keeping
/// their recency slot.
#[derive(Debug)]
pub struct RasterCache {
    cache: LruCache<usize, RasterImage>,
    dpi: f32,
    renders: u64,
}

impl Default for RasterCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl RasterCache {
    /// Create a new cache with the given capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_dpi(capacity, DEFAULT_DPI)
    }

    #[must_use]
    pub fn with_dpi(capacity: usize, dpi: f32) -> Self {
        Self {
            cache: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            ),
            dpi,
            renders: 0,
        }
    }

    /// Get the image for `page`, rendering it on a miss or when stale.
    ///
    /// Promotes the page to most-recently-used.
    pub fn get<D: DocumentBackend + ?Sized>(
        &mut self,
        doc: &D,
        page: usize,
        params: RenderParams,
    ) -> Result<&RasterImage, RenderError> {
        let lookup = match self.cache.get(&page) {
            Some(image) if image.is_valid_for(params) => Lookup::Fresh,
            Some(_) => Lookup::Stale,
            None => Lookup::Missing,
        };

        match lookup {
            Lookup::Fresh => {}
            Lookup::Stale => {
                if let Some(image) = self.cache.peek_mut(&page) {
                    image.release();
                }
                match self.render(doc, page, params) {
                    Ok(fresh) => {
                        if let Some(slot) = self.cache.peek_mut(&page) {
                            *slot = fresh;
                        }
                    }
                    Err(e) => {
                        self.cache.pop(&page);
                        warn!("Re-render of page {page} failed, dropped from cache: {e}");
                        return Err(e);
                    }
                }
            }
            Lookup::Missing => {
                if self.cache.len() == self.cache.cap().get() {
                    if let Some((evicted, _)) = self.cache.pop_lru() {
                        debug!("Evicted page {evicted}");
                    }
                }
                let image = self.render(doc, page, params)?;
                self.cache.put(page, image);
            }
        }

        self.cache
            .peek(&page)
            .ok_or_else(|| RenderError::backend(page, "image missing after render"))
    }

    /// Pixel size of `page`, falling back to its bounds when rendering fails
    pub fn extent<D: DocumentBackend + ?Sized>(
        &mut self,
        doc: &D,
        page: usize,
        params: RenderParams,
    ) -> Result<(u32, u32), RenderError> {
        let dpi = self.dpi;
        match self.get(doc, page, params) {
            Ok(image) => Ok((image.width, image.height)),
            Err(e) => {
                warn!("Page {page} unavailable, using its bounds: {e}");
                page_extent(doc, page, params, dpi)
            }
        }
    }

    fn render<D: DocumentBackend + ?Sized>(
        &mut self,
        doc: &D,
        page: usize,
        params: RenderParams,
    ) -> Result<RasterImage, RenderError> {
        self.renders += 1;
        rasterize(doc, page, params, self.dpi)
    }

    /// Look at a cached image without promoting it
    #[must_use]
    pub fn peek(&self, page: usize) -> Option<&RasterImage> {
        self.cache.peek(&page)
    }

    #[must_use]
    pub fn contains(&self, page: usize) -> bool {
        self.cache.contains(&page)
    }

    /// Cached pages, most recently used first
    #[must_use]
    pub fn pages(&self) -> Vec<usize> {
        self.cache.iter().map(|(page, _)| *page).collect()
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<usize> {
        self.cache.iter().next().map(|(page, _)| *page)
    }

    /// Release every image, returning how many were held
    pub fn clear(&mut self) -> usize {
        let released = self.cache.len();
        self.cache.clear();
        released
    }

    /// Number of cached pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    #[must_use]
    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Total renders performed, including re-renders
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeDocument;

    fn params(scale: f32) -> RenderParams {
        RenderParams {
            scale,
            rotation: 0.0,
        }
    }

    #[test]
    fn cache_insert_and_get() {
        let doc = FakeDocument::with_pixel_pages(3, 100, 200);
        let mut cache = RasterCache::new(10);

        let image = cache.get(&doc, 1, params(1.0)).unwrap();
        assert_eq!((image.page, image.width, image.height), (1, 100, 200));
        assert_eq!(image.pixels.len(), 4 * 100 * 200);

        assert!(cache.contains(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(doc.render_count(), 1);
    }

    #[test]
    fn hit_does_not_render_again() {
        let doc = FakeDocument::with_pixel_pages(3, 100, 200);
        let mut cache = RasterCache::new(10);

        cache.get(&doc, 0, params(1.0)).unwrap();
        cache.get(&doc, 0, params(1.0)).unwrap();

        assert_eq!(doc.render_count(), 1);
        assert_eq!(cache.renders(), 1);
    }

    #[test]
    fn twelve_pages_leave_the_last_ten() {
        let doc = FakeDocument::with_pixel_pages(13, 10, 10);
        let mut cache = RasterCache::new(10);

        for page in 1..=12 {
            cache.get(&doc, page, params(1.0)).unwrap();
        }

        assert_eq!(cache.len(), 10);
        let mut pages = cache.pages();
        assert_eq!(pages[0], 12);
        assert_eq!(cache.most_recent(), Some(12));
        pages.sort_unstable();
        assert_eq!(pages, (3..=12).collect::<Vec<_>>());
    }

    #[test]
    fn hit_promotes_to_most_recent() {
        let doc = FakeDocument::with_pixel_pages(5, 10, 10);
        let mut cache = RasterCache::new(3);

        for page in 0..3 {
            cache.get(&doc, page, params(1.0)).unwrap();
        }
        cache.get(&doc, 0, params(1.0)).unwrap();
        cache.get(&doc, 3, params(1.0)).unwrap();

        // page 1 was least recently used, not page 0
        assert_eq!(cache.pages(), vec![3, 0, 2]);
    }

    #[test]
    fn stale_scale_rerenders_in_place() {
        let doc = FakeDocument::with_pixel_pages(3, 100, 100);
        let mut cache = RasterCache::new(10);

        for page in 0..3 {
            cache.get(&doc, page, params(1.0)).unwrap();
        }
        let before = cache.peek(1).unwrap().pixels.clone();

        let image = cache.get(&doc, 1, params(2.0)).unwrap();
        assert_eq!((image.width, image.height), (200, 200));
        assert_eq!(image.params, params(2.0));
        assert_ne!(image.pixels, before);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.pages()[0], 1);
        assert_eq!(doc.render_count(), 4);
    }

    #[test]
    fn stale_rerender_in_full_cache_keeps_every_entry() {
        let doc = FakeDocument::with_pixel_pages(10, 20, 20);
        let mut cache = RasterCache::new(10);

        for page in 0..10 {
            cache.get(&doc, page, params(1.0)).unwrap();
        }
        let mut before = cache.pages();
        before.sort_unstable();

        let image = cache.get(&doc, 4, params(1.5)).unwrap();
        assert_eq!((image.width, image.height), (30, 30));

        assert_eq!(cache.len(), 10);
        let mut after = cache.pages();
        after.sort_unstable();
        assert_eq!(after, before);
        assert_eq!(cache.most_recent(), Some(4));
    }

    #[test]
    fn rotation_change_is_stale() {
        let doc = FakeDocument::with_pixel_pages(1, 100, 50);
        let mut cache = RasterCache::new(10);

        cache.get(&doc, 0, params(1.0)).unwrap();
        let rotated = RenderParams {
            scale: 1.0,
            rotation: 90.0,
        };
        let image = cache.get(&doc, 0, rotated).unwrap();

        assert_eq!((image.width, image.height), (50, 100));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_render_is_not_cached() {
        let doc = FakeDocument::with_pixel_pages(3, 10, 10);
        doc.set_failing(2, true);
        let mut cache = RasterCache::new(10);

        assert!(cache.get(&doc, 2, params(1.0)).is_err());
        assert!(!cache.contains(2));
        assert!(cache.is_empty());

        doc.set_failing(2, false);
        assert!(cache.get(&doc, 2, params(1.0)).is_ok());
    }

    #[test]
    fn failed_rerender_drops_the_stale_entry() {
        let doc = FakeDocument::with_pixel_pages(3, 10, 10);
        let mut cache = RasterCache::new(10);
        cache.get(&doc, 0, params(1.0)).unwrap();
        cache.get(&doc, 1, params(1.0)).unwrap();

        doc.set_failing(0, true);
        assert!(cache.get(&doc, 0, params(2.0)).is_err());

        assert!(!cache.contains(0));
        assert_eq!(cache.pages(), vec![1]);
    }

    #[test]
    fn extent_falls_back_to_bounds() {
        let doc = FakeDocument::with_pixel_pages(2, 120, 80);
        doc.set_failing(1, true);
        let mut cache = RasterCache::new(10);

        assert_eq!(cache.extent(&doc, 1, params(1.0)).unwrap(), (120, 80));
        assert!(!cache.contains(1));
    }

    #[test]
    fn out_of_range_page_is_an_error() {
        let doc = FakeDocument::with_pixel_pages(2, 10, 10);
        let mut cache = RasterCache::new(10);

        assert!(matches!(
            cache.get(&doc, 5, params(1.0)),
            Err(RenderError::PageOutOfRange { page: 5, count: 2 })
        ));
    }

    #[test]
    fn clear_releases_everything() {
        let doc = FakeDocument::with_pixel_pages(4, 10, 10);
        let mut cache = RasterCache::new(10);
        for page in 0..4 {
            cache.get(&doc, page, params(1.0)).unwrap();
        }

        assert_eq!(cache.clear(), 4);
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_still_holds_one_page() {
        let cache = RasterCache::new(0);
        assert_eq!(cache.capacity(), 1);
    }
}
